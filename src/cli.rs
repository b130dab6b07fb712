use clap::{Parser, Subcommand, ValueEnum};

/// Minimart — mini e-commerce microservices
#[derive(Parser)]
#[command(name = "minimart", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start one service (or all of them)
    Serve {
        /// Which service to run
        #[arg(short, long, value_enum, default_value = "all")]
        service: Service,

        /// Override the configured port (ignored for `all`)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    Auth,
    Profile,
    Products,
    Inventory,
    Gateway,
    /// Run every service in this process on its configured port
    All,
}
