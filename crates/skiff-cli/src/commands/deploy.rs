//! The deploy command: wire the HTTP control plane to the rollout
//! coordinator and report progress on stdout.

use skiff_control::HttpControlPlane;
use skiff_core::{DeploymentRequest, RolloutCoordinator, RolloutEvent};

pub async fn deploy(request: DeploymentRequest, endpoint: Option<String>) -> anyhow::Result<()> {
    // Validate up front so the exemplar pick below cannot fail and no
    // connection is attempted for a hopeless request.
    request.validate()?;
    let exemplar = request.apps[0].clone();

    let endpoint =
        endpoint.unwrap_or_else(|| HttpControlPlane::regional_endpoint(&request.region));
    let control = HttpControlPlane::new(&endpoint)?;

    println!(
        "Deploying {image} to cluster {cluster} in {region} ({count} app(s), exemplar {exemplar})",
        image = request.image(),
        cluster = request.cluster,
        region = request.region,
        count = request.apps.len(),
    );

    let debug = request.debug;
    let mut coordinator = RolloutCoordinator::new(&control);
    let outcome = coordinator
        .run(&request, &exemplar, |event| report(event, debug))
        .await?;

    println!(
        "✓ Deployed revision {revision} of {family} to {count} service(s)",
        revision = outcome.revision.revision,
        family = outcome.revision.family,
        count = outcome.updated.len(),
    );
    Ok(())
}

fn report(event: RolloutEvent, debug: bool) {
    match event {
        RolloutEvent::ExemplarLocated {
            service,
            cluster_arn,
            desired_count,
        } => {
            println!("Found service {service} on {cluster_arn} (desired count {desired_count})");
        }
        RolloutEvent::DefinitionFetched { snapshot } => {
            println!(
                "Fetched task definition for family {} ({} container(s))",
                snapshot.family,
                snapshot.container_definitions.len(),
            );
            if debug {
                println!("{}", pretty(&snapshot));
            }
        }
        RolloutEvent::DefinitionMutated { definition } => {
            if debug {
                println!("Will register:");
                println!("{}", pretty(&definition));
            }
        }
        RolloutEvent::RevisionRegistered { revision } => {
            println!(
                "Registered {family} revision {rev}: {arn}",
                family = revision.family,
                rev = revision.revision,
                arn = revision.arn,
            );
        }
        RolloutEvent::ServiceUpdated { service, arn } => {
            println!("Updated service {service} to {arn}");
        }
    }
}

fn pretty(doc: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|e| format!("<unprintable document: {e}>"))
}
