use k8s_openapi::api::core::v1::Volume;

use crate::k8s_helper::volume::{HostPathType, VolumeBuilder};

pub const LOGS_VOLUME: &str = "logs";
pub const HOST_DEV_VOLUME: &str = "host-dev";
pub const HOST_HOME_VOLUME: &str = "host-home";
pub const HOST_SYS_VOLUME: &str = "host-sys";
pub const HOST_ROOT_VOLUME: &str = "host-root";
pub const HOST_RUN_UDEV_VOLUME: &str = "host-run-udev";
pub const HOST_RUN_LVM_VOLUME: &str = "host-run-lvm";
pub const HOST_RUN_LOCK_VOLUME: &str = "host-run-lock";
pub const CSI_SOCKET_DIR_VOLUME: &str = "csi-socket-dir";
pub const REGISTRATION_DIR_VOLUME: &str = "registration-dir";
pub const MOUNTPOINT_DIR_VOLUME: &str = "mountpoint-dir";
pub const CSI_PATH_VOLUME: &str = "csi-path";
pub const DRIVE_CONFIG_VOLUME: &str = "drive-config";

/// Config map holding the loopback drive manager settings, if any.
pub const LOOPBACK_CONFIG_MAP: &str = "loopback-config";

pub const CSI_SOCKET_HOST_DIR: &str = "/var/lib/kubelet/plugins/csi-baremetal";

/// Volumes of the node pod. Containers refer to them by name.
pub fn node_volumes() -> Vec<Volume> {
    use HostPathType::{Directory, DirectoryOrCreate};

    vec![
        VolumeBuilder::new(LOGS_VOLUME).empty_dir().into(),
        VolumeBuilder::new(HOST_DEV_VOLUME)
            .host_path("/dev", Directory)
            .into(),
        VolumeBuilder::new(HOST_HOME_VOLUME)
            .host_path("/home", Directory)
            .into(),
        VolumeBuilder::new(HOST_SYS_VOLUME)
            .host_path("/sys", Directory)
            .into(),
        VolumeBuilder::new(HOST_ROOT_VOLUME)
            .host_path("/", Directory)
            .into(),
        VolumeBuilder::new(HOST_RUN_UDEV_VOLUME)
            .host_path("/run/udev", Directory)
            .into(),
        VolumeBuilder::new(HOST_RUN_LVM_VOLUME)
            .host_path("/run/lvm", Directory)
            .into(),
        VolumeBuilder::new(HOST_RUN_LOCK_VOLUME)
            .host_path("/run/lock", Directory)
            .into(),
        // The kubelet may not have created these yet on a fresh node.
        VolumeBuilder::new(CSI_SOCKET_DIR_VOLUME)
            .host_path(CSI_SOCKET_HOST_DIR, DirectoryOrCreate)
            .into(),
        VolumeBuilder::new(REGISTRATION_DIR_VOLUME)
            .host_path("/var/lib/kubelet/plugins_registry/", DirectoryOrCreate)
            .into(),
        VolumeBuilder::new(MOUNTPOINT_DIR_VOLUME)
            .host_path("/var/lib/kubelet/pods", Directory)
            .into(),
        VolumeBuilder::new(CSI_PATH_VOLUME)
            .host_path("/var/lib/kubelet/plugins/kubernetes.io/csi", Directory)
            .into(),
        VolumeBuilder::new(DRIVE_CONFIG_VOLUME)
            .optional_config_map(LOOPBACK_CONFIG_MAP)
            .into(),
    ]
}
