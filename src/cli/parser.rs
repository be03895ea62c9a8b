use clap::{Parser, Subcommand};

/// Command-line interface definition for marcaje
/// CLI application to classify and record attendance clock events
#[derive(Parser)]
#[command(
    name = "marcaje",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance clock-in/out: classify events against work schedules, geofence and weekly streaks",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override policy file path
    #[arg(global = true, long = "policy")]
    pub policy: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database, configuration and policy files
    Init,

    /// Manage the configuration and policy files
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Validate the attendance policy file")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,

        #[arg(
            long = "rebuild-counters",
            help = "Recompute weekly counters from the event log"
        )]
        rebuild_counters: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the employee registry
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// Register a check-in for an employee
    In {
        /// Full DNI or its trailing digits
        who: String,

        /// Event instant override, "YYYY-MM-DD HH:MM" local time
        #[arg(long = "at")]
        at: Option<String>,

        /// Device latitude
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Device longitude
        #[arg(long = "lon", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Clock as an admin caller (geofence failures flag, not block)
        #[arg(long = "admin")]
        admin: bool,

        /// Free-text justification for a late arrival
        #[arg(long = "justify")]
        justify: Option<String>,

        /// Justification category (traffic, health, transport, permits, weather, other)
        #[arg(long = "category")]
        category: Option<String>,

        /// Manager sign-off for an out-of-range event
        #[arg(long = "authorized-by")]
        authorized_by: Option<String>,
    },

    /// Register a check-out for an employee
    Out {
        /// Full DNI or its trailing digits
        who: String,

        /// Event instant override, "YYYY-MM-DD HH:MM" local time
        #[arg(long = "at")]
        at: Option<String>,

        /// Device latitude
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Device longitude
        #[arg(long = "lon", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Clock as an admin caller (geofence failures flag, not block)
        #[arg(long = "admin")]
        admin: bool,

        /// Free-text justification for an early departure
        #[arg(long = "justify")]
        justify: Option<String>,

        /// Justification category (traffic, health, transport, permits, weather, other)
        #[arg(long = "category")]
        category: Option<String>,

        /// Task description for overtime
        #[arg(long = "task")]
        task: Option<String>,

        /// Manager sign-off for an out-of-range event
        #[arg(long = "authorized-by")]
        authorized_by: Option<String>,
    },

    /// List recorded clock events
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "today", help = "Show only today's events")]
        today: bool,

        #[arg(long = "json", help = "Emit events as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCmd {
    /// Register a new employee
    Add {
        /// Document number (DNI)
        dni: String,

        /// Full name
        #[arg(long = "name")]
        name: String,
    },

    /// List all employees
    List,

    /// Deactivate an employee (kept for history, no longer clockable)
    Off {
        /// Document number (DNI)
        dni: String,
    },
}
