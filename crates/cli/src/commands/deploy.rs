//! Cloud Run deployment command.
//!
//! # Usage
//!
//! ```bash
//! # Print the gcloud command without running it
//! vr-cli deploy --service-name retail-mcp --dry-run
//!
//! # Deploy into a VPC with internal-only ingress
//! vr-cli deploy --service-name retail-mcp --network my-vpc --subnet my-subnet --ingress internal
//! ```
//!
//! # Environment Variables
//!
//! - `APP_LOCATION` - `LOCATION` for the deployed service (default `global`)
//! - `APP_CATALOG_ID` - `CATALOG_ID` for the deployed service (default `default_catalog`)
//! - `APP_SERVING_CONFIG_ID` - `SERVING_CONFIG_ID` for the deployed service (default `default_search`)

use std::io;
use std::process::Command;

use clap::{Args, ValueEnum};
use thiserror::Error;

/// Container image name inside the Artifact Registry repository.
pub const IMAGE_NAME: &str = "vertex-retail-mcp";

const GCLOUD: &str = "gcloud";

/// Errors that abort a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The gcloud binary is not on `PATH`.
    #[error("'gcloud' command not found. Please ensure the Google Cloud SDK is installed and in your PATH")]
    GcloudNotFound,

    /// gcloud could not be spawned for another reason.
    #[error("Failed to run gcloud: {0}")]
    Io(#[source] io::Error),

    /// No `--project-id` and no active gcloud project.
    #[error(
        "No project ID found. Run 'gcloud init' or 'gcloud config set project YOUR_PROJECT_ID'"
    )]
    MissingProject,

    /// `gcloud config get-value` exited non-zero.
    #[error("Error getting {key} from gcloud: {stderr}")]
    ConfigLookup {
        /// Config key that was read.
        key: String,
        /// gcloud's error output.
        stderr: String,
    },

    /// `gcloud run deploy` exited non-zero.
    #[error("Deployment failed ({0}). Please check the error message above")]
    DeployFailed(String),
}

/// Cloud Run ingress setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Ingress {
    Internal,
    All,
    InternalAndCloudLoadBalancing,
}

impl Ingress {
    /// Value passed to `--ingress`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::All => "all",
            Self::InternalAndCloudLoadBalancing => "internal-and-cloud-load-balancing",
        }
    }
}

/// Cloud Run VPC egress setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VpcEgress {
    AllTraffic,
    PrivateRangesOnly,
}

impl VpcEgress {
    /// Value passed to `--vpc-egress`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllTraffic => "all-traffic",
            Self::PrivateRangesOnly => "private-ranges-only",
        }
    }
}

/// Arguments for `vr-cli deploy`.
#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    /// Google Cloud project ID [default: active gcloud project]
    #[arg(long)]
    pub project_id: Option<String>,

    /// Region for Cloud Run and Artifact Registry
    #[arg(long, default_value = "us-central1")]
    pub region: String,

    /// Artifact Registry repository name
    #[arg(long, default_value = "mcp-repo")]
    pub repository_name: String,

    /// Name of the Cloud Run service
    #[arg(long)]
    pub service_name: String,

    /// Service account used by the Cloud Run service
    #[arg(long)]
    pub service_account: Option<String>,

    /// VPC network for the service
    #[arg(long)]
    pub network: Option<String>,

    /// VPC subnet for the service (requires --network)
    #[arg(long, requires = "network")]
    pub subnet: Option<String>,

    /// Ingress control for the service
    #[arg(long, value_enum, default_value_t = Ingress::All)]
    pub ingress: Ingress,

    /// VPC egress control
    #[arg(long, value_enum, default_value_t = VpcEgress::AllTraffic)]
    pub vpc_egress: VpcEgress,

    /// Retail location for the deployed service
    #[arg(long, env = "APP_LOCATION", default_value = "global")]
    pub app_location: String,

    /// Retail catalog for the deployed service
    #[arg(long, env = "APP_CATALOG_ID", default_value = "default_catalog")]
    pub app_catalog_id: String,

    /// Retail serving config for the deployed service
    #[arg(long, env = "APP_SERVING_CONFIG_ID", default_value = "default_search")]
    pub app_serving_config_id: String,

    /// Print the gcloud command without executing it
    #[arg(long)]
    pub dry_run: bool,
}

/// The external gcloud CLI.
pub trait Gcloud {
    /// Read `gcloud config get-value {key}`, trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if gcloud is missing or exits non-zero.
    fn config_value(&self, key: &str) -> Result<String, DeployError>;

    /// Run gcloud with `args`, streaming its output to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if gcloud is missing or exits non-zero.
    fn run(&self, args: &[String]) -> Result<(), DeployError>;
}

/// gcloud resolved from `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGcloud;

impl Gcloud for SystemGcloud {
    fn config_value(&self, key: &str) -> Result<String, DeployError> {
        let output = Command::new(GCLOUD)
            .args(["config", "get-value", key])
            .output()
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(DeployError::ConfigLookup {
                key: key.to_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    fn run(&self, args: &[String]) -> Result<(), DeployError> {
        let status = Command::new(GCLOUD)
            .args(args)
            .status()
            .map_err(spawn_error)?;

        if status.success() {
            Ok(())
        } else {
            Err(DeployError::DeployFailed(status.to_string()))
        }
    }
}

fn spawn_error(e: io::Error) -> DeployError {
    if e.kind() == io::ErrorKind::NotFound {
        DeployError::GcloudNotFound
    } else {
        DeployError::Io(e)
    }
}

/// A fully resolved deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub project_id: String,
    pub region: String,
    pub service_name: String,
    pub service_account: Option<String>,
    pub image: String,
    pub network: Option<String>,
    pub subnet: Option<String>,
    pub ingress: Ingress,
    pub vpc_egress: VpcEgress,
    /// Environment for the deployed server, in `--set-env-vars` order.
    pub app_env: Vec<(&'static str, String)>,
}

impl DeployPlan {
    /// Resolve the project id and derive the image and app environment.
    ///
    /// gcloud is only consulted when `--project-id` was not given.
    ///
    /// # Errors
    ///
    /// Returns an error if the project id cannot be resolved.
    pub fn resolve(args: &DeployArgs, gcloud: &dyn Gcloud) -> Result<Self, DeployError> {
        let project_id = match &args.project_id {
            Some(project_id) => project_id.clone(),
            None => {
                let project_id = gcloud.config_value("project")?;
                if project_id.is_empty() {
                    return Err(DeployError::MissingProject);
                }
                project_id
            }
        };

        let image = format!(
            "{}-docker.pkg.dev/{}/{}/{IMAGE_NAME}:latest",
            args.region, project_id, args.repository_name
        );

        let app_env = vec![
            ("PROJECT_ID", project_id.clone()),
            ("LOCATION", args.app_location.clone()),
            ("CATALOG_ID", args.app_catalog_id.clone()),
            ("SERVING_CONFIG_ID", args.app_serving_config_id.clone()),
        ];

        Ok(Self {
            project_id,
            region: args.region.clone(),
            service_name: args.service_name.clone(),
            service_account: args.service_account.clone(),
            image,
            network: args.network.clone(),
            subnet: args.subnet.clone(),
            ingress: args.ingress,
            vpc_egress: args.vpc_egress,
            app_env,
        })
    }

    /// `K=V` pairs joined with commas.
    #[must_use]
    pub fn env_vars(&self) -> String {
        self.app_env
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Arguments to gcloud (without the program name).
    #[must_use]
    pub fn gcloud_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "run".into(),
            "deploy".into(),
            self.service_name.clone(),
            "--image".into(),
            self.image.clone(),
            "--region".into(),
            self.region.clone(),
            "--ingress".into(),
            self.ingress.as_str().into(),
            "--vpc-egress".into(),
            self.vpc_egress.as_str().into(),
            format!("--set-env-vars={}", self.env_vars()),
            "--allow-unauthenticated".into(),
        ];

        if let Some(network) = &self.network {
            args.extend(["--network".into(), network.clone()]);
        }
        if let Some(subnet) = &self.subnet {
            args.extend(["--subnet".into(), subnet.clone()]);
        }
        if let Some(account) = &self.service_account {
            args.extend(["--service-account".into(), account.clone()]);
        }

        args
    }

    /// The full command line, space separated.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(GCLOUD.to_owned())
            .chain(self.gcloud_args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn log_summary(&self) {
        tracing::info!("Starting deployment of '{}' to Cloud Run", self.service_name);
        tracing::info!("  Project:         {}", self.project_id);
        tracing::info!("  Region:          {}", self.region);
        tracing::info!("  Service:         {}", self.service_name);
        if let Some(account) = &self.service_account {
            tracing::info!("  Service Account: {account}");
        }
        tracing::info!("  Image:           {}", self.image);
        if let Some(network) = &self.network {
            tracing::info!("  Network:         {network}");
        }
        if let Some(subnet) = &self.subnet {
            tracing::info!("  Subnet:          {subnet}");
        }
        tracing::info!("  Ingress:         {}", self.ingress.as_str());
        tracing::info!("  VPC Egress:      {}", self.vpc_egress.as_str());
        for (key, value) in &self.app_env {
            tracing::info!("  {key:<18} {value}");
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The command was printed and not executed.
    DryRun(String),
    /// gcloud ran and exited successfully.
    Deployed,
}

/// Resolve, summarize, then print or execute the deployment.
///
/// # Errors
///
/// Returns an error if the project id cannot be resolved or gcloud fails.
pub fn run(args: &DeployArgs, gcloud: &dyn Gcloud) -> Result<DeployOutcome, DeployError> {
    let plan = DeployPlan::resolve(args, gcloud)?;
    plan.log_summary();

    if args.dry_run {
        let command = plan.command_line();
        #[allow(clippy::print_stdout)]
        {
            println!("DRY RUN: The following command would be executed:\n");
            println!("{command}");
        }
        return Ok(DeployOutcome::DryRun(command));
    }

    gcloud.run(&plan.gcloud_args())?;

    tracing::info!(
        "Service '{}' has been deployed successfully",
        plan.service_name
    );
    Ok(DeployOutcome::Deployed)
}
