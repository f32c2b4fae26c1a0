//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use driveflow_core::domain::{CustomerForm, VehicleForm};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "driveflow",
    bin_name = "driveflow",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Vehicle rental back office",
    long_about = "DriveFlow keeps the customer and vehicle records of a \
                  rental agency in a local SQLite database.",
    after_help = "EXAMPLES:\n\
        \x20 driveflow db init\n\
        \x20 driveflow customers save --first-name Ana --last-name Diaz --national-id 12345678 --license L-1\n\
        \x20 driveflow vehicles list --search toyota --status Disponible\n\
        \x20 driveflow completions bash > /usr/share/bash-completion/completions/driveflow",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `true` for commands that never touch the database.
    pub fn is_offline(&self) -> bool {
        matches!(
            self.command,
            Commands::Config(_) | Commands::Init(_) | Commands::Completions(_)
        )
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard.
    #[command(
        visible_alias = "ui",
        about = "Interactive dashboard",
        after_help = "EXAMPLES:\n\
            \x20 driveflow dashboard"
    )]
    Dashboard,

    /// Manage customers.
    #[command(
        visible_alias = "c",
        about = "Customer management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 driveflow customers list --format csv\n\
            \x20 driveflow customers search perez\n\
            \x20 driveflow customers delete 3"
    )]
    Customers(CustomerCommands),

    /// Manage vehicles.
    #[command(
        visible_alias = "v",
        about = "Vehicle management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 driveflow vehicles list --status Disponible\n\
            \x20 driveflow vehicles save --brand Toyota --model Corolla --year 2022 \\\n\
            \x20     --plate ABC-123 --type Sedan --status Disponible --price 45 --image car.png\n\
            \x20 driveflow vehicles thumbnail 1 --size 64"
    )]
    Vehicles(VehicleCommands),

    /// Show reference data.
    #[command(
        about = "Vehicle types and statuses",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 driveflow catalog types\n\
            \x20 driveflow catalog statuses --format json"
    )]
    Catalog(CatalogCommands),

    /// Database maintenance.
    #[command(
        about = "Database maintenance",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 driveflow db init\n\
            \x20 DRIVEFLOW__DATABASE__URL=sqlite://other.db driveflow db init"
    )]
    Db(DbCommands),

    /// Initialise a DriveFlow configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 driveflow init           # platform config directory\n\
            \x20 driveflow init --local   # ./driveflow.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 driveflow completions bash > ~/.local/share/bash-completion/completions/driveflow\n\
            \x20 driveflow completions zsh  > ~/.zfunc/_driveflow\n\
            \x20 driveflow completions fish > ~/.config/fish/completions/driveflow.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the DriveFlow configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 driveflow config get database.url\n\
            \x20 driveflow config list"
    )]
    Config(ConfigCommands),
}

// ── customers ────────────────────────────────────────────────────────────────

/// Subcommands for `driveflow customers`.
#[derive(Debug, Subcommand)]
pub enum CustomerCommands {
    /// List every customer.
    #[command(visible_alias = "ls")]
    List(FormatArgs),

    /// Customers whose name, national ID or district contains TERM.
    Search {
        /// Text to look for (case-insensitive).
        term: String,
        #[command(flatten)]
        format: FormatArgs,
    },

    /// Show one customer.
    Show {
        /// Customer id.
        id: i64,
    },

    /// Create a customer, or update one with `--id`.
    Save(CustomerSaveArgs),

    /// Delete a customer.
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

/// Arguments for `driveflow customers save`.
#[derive(Debug, Args)]
pub struct CustomerSaveArgs {
    /// Update this customer instead of creating one.
    #[arg(long, value_name = "ID")]
    pub id: Option<i64>,

    #[arg(long, value_name = "NAME", default_value = "")]
    pub first_name: String,

    #[arg(long, value_name = "NAME", default_value = "")]
    pub last_name: String,

    /// Eight-digit national ID.
    #[arg(long, value_name = "DIGITS", default_value = "")]
    pub national_id: String,

    /// Driver's licence number.
    #[arg(long, value_name = "NUMBER", default_value = "")]
    pub license: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub district: Option<String>,
}

impl CustomerSaveArgs {
    pub fn to_form(&self) -> CustomerForm {
        CustomerForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            national_id: self.national_id.clone(),
            license: self.license.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            district: self.district.clone(),
        }
    }
}

// ── vehicles ─────────────────────────────────────────────────────────────────

/// Subcommands for `driveflow vehicles`.
#[derive(Debug, Subcommand)]
pub enum VehicleCommands {
    /// List vehicles, optionally filtered.
    #[command(visible_alias = "ls")]
    List(VehicleListArgs),

    /// Show one vehicle.
    Show {
        /// Vehicle id.
        id: i64,
    },

    /// Create a vehicle, or update one with `--id`.
    Save(VehicleSaveArgs),

    /// Delete a vehicle.
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Print the size of a vehicle's thumbnail.
    Thumbnail {
        /// Vehicle id.
        id: i64,
        /// Bounding box edge in pixels (defaults to `images.thumbnail_size`).
        #[arg(long, value_name = "PX")]
        size: Option<u32>,
    },
}

/// Arguments for `driveflow vehicles list`.
#[derive(Debug, Args)]
pub struct VehicleListArgs {
    /// Brand, model or plate containing this text.
    #[arg(short = 's', long, value_name = "TERM", default_value = "")]
    pub search: String,

    /// Status name, or `all`.
    #[arg(long, value_name = "STATUS", default_value = "all")]
    pub status: String,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// Arguments for `driveflow vehicles save`.
///
/// Numbers are taken as text so the form validation reports bad values.
#[derive(Debug, Args)]
pub struct VehicleSaveArgs {
    /// Update this vehicle instead of creating one.
    #[arg(long, value_name = "ID")]
    pub id: Option<i64>,

    #[arg(long, default_value = "")]
    pub brand: String,

    #[arg(long, default_value = "")]
    pub model: String,

    #[arg(long, default_value = "")]
    pub year: String,

    #[arg(long, default_value = "")]
    pub plate: String,

    /// Vehicle type name, e.g. `Sedan`.
    #[arg(long = "type", value_name = "TYPE", default_value = "")]
    pub vehicle_type: String,

    /// Status name, e.g. `Disponible`.
    #[arg(long, default_value = "")]
    pub status: String,

    /// Daily price.
    #[arg(long, value_name = "AMOUNT", default_value = "")]
    pub price: String,

    #[arg(long, value_name = "KM")]
    pub odometer: Option<String>,

    /// Picture to import into the images directory.
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

impl VehicleSaveArgs {
    /// Form for these arguments; `image` is the stored image name, if any.
    pub fn to_form(&self, image: Option<String>) -> VehicleForm {
        VehicleForm {
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year.clone(),
            plate: self.plate.clone(),
            type_name: self.vehicle_type.clone(),
            status_name: self.status.clone(),
            price_per_day: self.price.clone(),
            odometer: self.odometer.clone(),
            image,
        }
    }
}

// ── shared ───────────────────────────────────────────────────────────────────

/// `--format` for list-style commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct FormatArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

/// Arguments for the `delete` subcommands.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Record id.
    pub id: i64,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Delete without asking")]
    pub yes: bool,
}

// ── catalog / db ─────────────────────────────────────────────────────────────

/// Subcommands for `driveflow catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Vehicle types and their base deposit.
    Types(FormatArgs),
    /// Vehicle statuses.
    Statuses(FormatArgs),
}

/// Subcommands for `driveflow db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Create the database if missing and apply migrations.
    Init,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `driveflow init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `driveflow.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `driveflow completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `driveflow config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `database.url`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_customer_save() {
        let cli = Cli::parse_from([
            "driveflow",
            "customers",
            "save",
            "--first-name",
            " juan ",
            "--last-name",
            "perez",
            "--national-id",
            "12345678",
            "--license",
            "L1",
        ]);
        let Commands::Customers(CustomerCommands::Save(args)) = cli.command else {
            panic!("expected customers save");
        };
        let form = args.to_form();
        assert_eq!(form.first_name, " juan ");
        assert_eq!(form.national_id, "12345678");
        assert_eq!(form.email, None);
        assert_eq!(args.id, None);
    }

    #[test]
    fn vehicle_list_defaults() {
        let cli = Cli::parse_from(["driveflow", "vehicles", "ls"]);
        let Commands::Vehicles(VehicleCommands::List(args)) = cli.command else {
            panic!("expected vehicles list");
        };
        assert_eq!(args.search, "");
        assert_eq!(args.status, "all");
        assert_eq!(args.format.format, ListFormat::Table);
    }

    #[test]
    fn vehicle_save_keeps_numbers_as_text() {
        let cli = Cli::parse_from([
            "driveflow", "v", "save", "--year", "20x2", "--type", "SUV", "--price", "45",
        ]);
        let Commands::Vehicles(VehicleCommands::Save(args)) = cli.command else {
            panic!("expected vehicles save");
        };
        let form = args.to_form(Some("vehicle_1_abcd1234.png".into()));
        assert_eq!(form.year, "20x2");
        assert_eq!(form.type_name, "SUV");
        assert_eq!(form.image.as_deref(), Some("vehicle_1_abcd1234.png"));
    }

    #[test]
    fn list_format_flag() {
        let cli = Cli::parse_from(["driveflow", "catalog", "types", "--format", "csv"]);
        assert!(matches!(
            cli.command,
            Commands::Catalog(CatalogCommands::Types(FormatArgs {
                format: ListFormat::Csv
            }))
        ));
    }

    #[test]
    fn offline_commands() {
        assert!(Cli::parse_from(["driveflow", "config", "path"]).is_offline());
        assert!(Cli::parse_from(["driveflow", "completions", "bash"]).is_offline());
        assert!(!Cli::parse_from(["driveflow", "db", "init"]).is_offline());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["driveflow", "--quiet", "--verbose", "db", "init"]);
        assert!(result.is_err());
    }

    #[test]
    fn delete_requires_an_id() {
        assert!(Cli::try_parse_from(["driveflow", "customers", "delete"]).is_err());
        assert!(Cli::try_parse_from(["driveflow", "customers", "delete", "x"]).is_err());
    }
}
