//! Prints the ModelDeployment CRD manifest as YAML.
//!
//! Usage: `cargo run --bin crdgen > modeldeployment-crd.yaml`

use crds::ModelDeployment;
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&ModelDeployment::crd())?);
    Ok(())
}
