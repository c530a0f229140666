//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--endpoint <url>`: Bridge endpoint, overriding the config file
//! - `--config <path>`: Read this config file instead of searching
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{DescriptorRole, EntityKind};

/// rosdesk - browse a ROS catalog and build forms from runtime schemas
#[derive(Parser, Debug)]
#[command(name = "rosdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bridge endpoint (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog names as a hierarchy
    #[command(
        name = "names",
        long_about = "List the names of one catalog kind as a hierarchy.\n\n\
            Names are split on '/' and merged into a forest, so topics sharing a \
            namespace are grouped under it. Use --flat to print the full names.",
        after_help = "\
EXAMPLES:
    rosdesk names topics
    rosdesk names services --flat
    rosdesk names params --endpoint http://robot.local:9090"
    )]
    Names {
        /// Which kind of entity to list
        #[arg(value_enum)]
        kind: KindArg,

        /// Print full names, one per line
        #[arg(long)]
        flat: bool,
    },

    /// Resolve a type and print its schema
    #[command(
        name = "schema",
        long_about = "Resolve a type into its full field schema.\n\n\
            Nested types are fetched from the catalog recursively. For service \
            types, choose the request or response side with --role.",
        after_help = "\
EXAMPLES:
    rosdesk schema geometry_msgs/Pose
    rosdesk schema std_srvs/SetBool --role request
    rosdesk schema nav_msgs/Path --json"
    )]
    Schema {
        /// Type name, e.g. geometry_msgs/Pose
        type_name: String,

        /// Which descriptor of the type to resolve
        #[arg(long, value_enum, default_value_t = RoleArg::Message)]
        role: RoleArg,

        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an input form for a type and print the composed value
    #[command(
        name = "template",
        long_about = "Build an input form for a type.\n\n\
            The form starts from saved values (if given), then each --set edit is \
            applied. Without --json the form fields are printed; with --json the \
            composed value is printed as it would be sent.",
        after_help = "\
EXAMPLES:
    rosdesk template geometry_msgs/Point --set x=1 --set y=2 --json
    rosdesk template nav_msgs/Path --saved path.json
    rosdesk template std_srvs/SetBool --role request --set data=true"
    )]
    Template {
        /// Type name
        type_name: String,

        /// Which descriptor of the type to use
        #[arg(long, value_enum, default_value_t = RoleArg::Message)]
        role: RoleArg,

        /// JSON file with previously saved values
        #[arg(long, value_name = "FILE")]
        saved: Option<PathBuf>,

        /// Set a field, e.g. pose.position.x=1.5 (repeatable)
        #[arg(long = "set", value_name = "PATH=TEXT")]
        sets: Vec<String>,

        /// Append a blank element to a composite array before --set edits
        #[arg(long = "append", value_name = "PATH")]
        appends: Vec<String>,

        /// Print the composed value as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a JSON message through a type's form
    #[command(
        name = "render",
        long_about = "Display a JSON message through a type's form.\n\n\
            Numbers are formatted with the configured number format; fields \
            missing from the message are left blank.",
        after_help = "\
EXAMPLES:
    rosdesk render geometry_msgs/Point --message point.json
    rosdesk render std_srvs/SetBool --role response --message reply.json"
    )]
    Render {
        /// Type name
        type_name: String,

        /// Which descriptor of the type to use
        #[arg(long, value_enum, default_value_t = RoleArg::Message)]
        role: RoleArg,

        /// JSON file with the message to display
        #[arg(long, value_name = "FILE")]
        message: PathBuf,
    },

    /// Call a service with a request composed from edits
    #[command(
        name = "call",
        long_about = "Call a service.\n\n\
            The request form is built from the service's request descriptor \
            and filled with --append and --set edits, exactly like `template \
            --role request`. The reply is shown through the response form.",
        after_help = "\
EXAMPLES:
    rosdesk call /reset
    rosdesk call /arm/set_joints --set names=[shoulder,elbow] --set positions=[0.5,1]
    rosdesk call /planner/plan --append goals --set goals[1].x=3 --json"
    )]
    Call {
        /// Service name
        service: String,

        /// Set a request field: PATH=TEXT (repeatable)
        #[arg(long = "set", value_name = "PATH=TEXT")]
        sets: Vec<String>,

        /// Add a blank element to a composite array in the request (repeatable)
        #[arg(long = "append", value_name = "PATH")]
        appends: Vec<String>,

        /// Print the reply as JSON instead of through the response form
        #[arg(long)]
        json: bool,
    },

    /// Read, write or delete a parameter
    Param {
        #[command(subcommand)]
        action: ParamAction,
    },

    /// Attach a panel to a target and print its fields
    #[command(
        name = "attach",
        after_help = "\
EXAMPLES:
    rosdesk attach monitor /odom
    rosdesk attach service /arm/set_joints
    rosdesk attach param /rate"
    )]
    Attach {
        /// Panel kind (see `rosdesk panels`)
        kind: String,

        /// Topic, service or parameter name
        target: String,
    },

    /// List the available panel kinds
    Panels,

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Catalog listing kinds
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Topics,
    Services,
    Params,
    Nodes,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Topics => EntityKind::Topics,
            KindArg::Services => EntityKind::Services,
            KindArg::Params => EntityKind::Params,
            KindArg::Nodes => EntityKind::Nodes,
        }
    }
}

/// Descriptor roles
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    /// Message type
    Message,
    /// Service request
    Request,
    /// Service response
    Response,
}

impl From<RoleArg> for DescriptorRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Message => DescriptorRole::Message,
            RoleArg::Request => DescriptorRole::ServiceRequest,
            RoleArg::Response => DescriptorRole::ServiceResponse,
        }
    }
}

/// Param subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ParamAction {
    /// Print a parameter's value
    Get {
        /// Parameter name
        name: String,
    },
    /// Set a parameter (numbers are sent as numbers, anything else as text)
    Set {
        /// Parameter name
        name: String,
        /// New value
        value: String,
    },
    /// Remove a parameter
    Delete {
        /// Parameter name
        name: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with every setting at its default
    Init {
        /// Where to write (defaults to ~/.rosdesk/config.toml)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
