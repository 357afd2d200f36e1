use csi_baremetal_operator::Deployment;
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&Deployment::crd())?);
    Ok(())
}
