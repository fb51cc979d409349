use clap::Parser;

use skiff_core::DeploymentRequest;

mod commands;

#[derive(Parser)]
#[command(
    name = "skiff",
    about = "Rolling image deploys across services sharing one task-definition family",
    version,
)]
struct Cli {
    /// Cluster name to deploy to
    #[arg(short, long)]
    cluster: String,

    /// Image repository to pull from
    #[arg(short, long)]
    image: String,

    /// Tag to deploy, usually a short git SHA
    #[arg(short, long, default_value = "latest")]
    tag: String,

    /// Region the cluster lives in
    #[arg(short, long)]
    region: String,

    /// Application name to update; repeatable, order-significant. The
    /// first one is the exemplar whose task definition and desired
    /// count template the whole rollout.
    #[arg(short, long = "app", value_name = "NAME", required = true)]
    apps: Vec<String>,

    /// Control-plane endpoint (default: derived from the region)
    #[arg(long)]
    endpoint: Option<String>,

    /// Print the fetched and to-be-registered task-definition documents
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_request(self) -> (DeploymentRequest, Option<String>) {
        let request = DeploymentRequest {
            cluster: self.cluster,
            repository: self.image,
            tag: self.tag,
            region: self.region,
            apps: self.apps,
            debug: self.debug,
        };
        (request, self.endpoint)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skiff=info".parse().unwrap()),
        )
        .init();

    let (request, endpoint) = Cli::parse().into_request();
    if let Err(err) = commands::deploy::deploy(request, endpoint).await {
        eprintln!("Failed: {err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apps_keep_flag_order() {
        let cli = Cli::try_parse_from([
            "skiff", "-c", "prod", "-i", "acme/app", "-r", "us-east-1", "-a", "web", "-a",
            "worker", "-a", "batch",
        ])
        .unwrap();
        assert_eq!(cli.apps, vec!["web", "worker", "batch"]);
    }

    #[test]
    fn tag_defaults_to_latest() {
        let cli = Cli::try_parse_from([
            "skiff", "-c", "prod", "-i", "acme/app", "-r", "us-east-1", "-a", "web",
        ])
        .unwrap();
        assert_eq!(cli.tag, "latest");
        assert!(!cli.debug);
    }

    #[test]
    fn at_least_one_app_is_required() {
        let result =
            Cli::try_parse_from(["skiff", "-c", "prod", "-i", "acme/app", "-r", "us-east-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn into_request_maps_every_field() {
        let cli = Cli::try_parse_from([
            "skiff", "-c", "prod", "-i", "acme/app", "-t", "abc123", "-r", "us-east-1", "-a",
            "web", "-d", "--endpoint", "http://localhost:7070",
        ])
        .unwrap();
        let (request, endpoint) = cli.into_request();
        assert_eq!(request.cluster, "prod");
        assert_eq!(request.image().to_string(), "acme/app:abc123");
        assert!(request.debug);
        assert_eq!(endpoint.as_deref(), Some("http://localhost:7070"));
    }
}
