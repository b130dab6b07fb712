//! Fire-and-forget stock notifications from the inventory service to the
//! product service.
//!
//! Dispatched on a detached task after the local stock mutation commits:
//! the inventory write's response never waits on delivery, and failures
//! are logged and swallowed — never retried, never surfaced to the
//! original client.

use std::time::Duration;

use serde_json::json;

/// Derive the severity message sent alongside a stock level.
pub fn severity_message(stock: u64) -> &'static str {
    if stock == 0 {
        "Product is out of stock"
    } else if stock <= 5 {
        "Product has low stock"
    } else {
        "Stock level updated"
    }
}

#[derive(Clone)]
pub struct StockNotifier {
    client: reqwest::Client,
    product_base_url: String,
}

impl StockNotifier {
    pub fn new(product_base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .connect_timeout(Duration::from_secs(2))
                .build()
                .expect("failed to build notification HTTP client"),
            product_base_url: product_base_url.into(),
        }
    }

    /// Send `{stock, message}` to the product service's notify endpoint.
    ///
    /// Returns immediately; delivery happens on a spawned task.
    pub fn dispatch(&self, product_id: u32, stock: u64) {
        let client = self.client.clone();
        let url = format!("{}/products/{}/notify", self.product_base_url, product_id);
        let payload = json!({ "stock": stock, "message": severity_message(stock) });

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(product_id, stock, "notified product service");
                }
                Ok(resp) => {
                    tracing::warn!(
                        product_id,
                        status = %resp.status(),
                        "product service rejected stock notification"
                    );
                }
                Err(e) => {
                    tracing::warn!(product_id, error = %e, "could not reach product service");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_stock_at_zero() {
        assert_eq!(severity_message(0), "Product is out of stock");
    }

    #[test]
    fn low_stock_up_to_five() {
        assert_eq!(severity_message(1), "Product has low stock");
        assert_eq!(severity_message(5), "Product has low stock");
    }

    #[test]
    fn normal_above_five() {
        assert_eq!(severity_message(6), "Stock level updated");
        assert_eq!(severity_message(200), "Stock level updated");
    }
}
