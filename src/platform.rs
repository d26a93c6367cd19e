// Host platform and CPU detection

use log::warn;

/// Operating system family, as far as launcher behavior is concerned.
///
/// Windows keeps native history and installs in the registry, macOS in a
/// shared file list and `/Applications` bundles. Everything else only has
/// what the companion extension mirrors into the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Other,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Other
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "Windows",
            HostPlatform::MacOs => "macOS",
            HostPlatform::Other => "other",
        }
    }
}

/// CPU family used to pick the installer flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuArch {
    Arm64,
    Intel,
}

impl CpuArch {
    pub fn current() -> Self {
        Self::from_machine(std::env::consts::ARCH)
    }

    /// Map a machine identifier (`uname -m` style) onto an installer flavour.
    /// Unknown machines fall back to Intel.
    pub fn from_machine(machine: &str) -> Self {
        match machine.to_lowercase().as_str() {
            "arm64" | "aarch64" => CpuArch::Arm64,
            "x86_64" | "amd64" => CpuArch::Intel,
            other => {
                warn!("Unknown architecture '{}', defaulting to Intel", other);
                CpuArch::Intel
            }
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            CpuArch::Arm64 => "arm64",
            CpuArch::Intel => "intel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_machine() {
        assert_eq!(CpuArch::from_machine("arm64"), CpuArch::Arm64);
        assert_eq!(CpuArch::from_machine("AArch64"), CpuArch::Arm64);
        assert_eq!(CpuArch::from_machine("x86_64"), CpuArch::Intel);
        assert_eq!(CpuArch::from_machine("AMD64"), CpuArch::Intel);
    }

    #[test]
    fn test_unknown_machine_defaults_to_intel() {
        assert_eq!(CpuArch::from_machine("riscv64"), CpuArch::Intel);
        assert_eq!(CpuArch::from_machine(""), CpuArch::Intel);
    }
}
