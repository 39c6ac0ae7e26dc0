//! Which side of the process boundary the engine runs on.

use std::fmt;
use std::sync::OnceLock;

/// Environment variable that marks a process as running inside the
/// native shell.
pub const NATIVE_SHELL_ENV: &str = "ROOMGATE_NATIVE_SHELL";

static CURRENT: OnceLock<Runtime> = OnceLock::new();

/// Where this process hosts the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// The engine is loaded as a module and invoked in this process.
    InProcess,
    /// The engine lives behind a native host boundary.
    Native,
}

impl Runtime {
    /// The runtime of this process.
    ///
    /// Read from [`NATIVE_SHELL_ENV`] on first call and fixed for the
    /// lifetime of the process afterwards.
    pub fn current() -> Self {
        *CURRENT.get_or_init(|| {
            let flag = std::env::var(NATIVE_SHELL_ENV).ok();
            let runtime = Self::from_flag(flag.as_deref());
            tracing::debug!(%runtime, "runtime detected");
            runtime
        })
    }

    /// Interprets the raw flag value. `1`, `true`, and `yes` (any case)
    /// mean native; anything else, including absence, means in-process.
    pub fn from_flag(flag: Option<&str>) -> Self {
        let native = flag.map(str::trim).is_some_and(|v| {
            ["1", "true", "yes"].iter().any(|t| v.eq_ignore_ascii_case(t))
        });
        if native { Self::Native } else { Self::InProcess }
    }

    /// The adapter this runtime dispatches through.
    pub fn adapter_kind(self) -> AdapterKind {
        match self {
            Self::InProcess => AdapterKind::Module,
            Self::Native => AdapterKind::Native,
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProcess => write!(f, "in-process"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// The two transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    /// Loads and runs the engine module in-process.
    Module,
    /// Calls out to the native host.
    Native,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Native => write!(f, "native"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag_truthy_values() {
        for v in ["1", "true", "TRUE", " yes "] {
            assert_eq!(Runtime::from_flag(Some(v)), Runtime::Native, "{v:?}");
        }
    }

    #[test]
    fn test_from_flag_defaults_to_in_process() {
        assert_eq!(Runtime::from_flag(None), Runtime::InProcess);
        assert_eq!(Runtime::from_flag(Some("")), Runtime::InProcess);
        assert_eq!(Runtime::from_flag(Some("0")), Runtime::InProcess);
    }

    #[test]
    fn test_current_is_stable() {
        assert_eq!(Runtime::current(), Runtime::current());
    }

    #[test]
    fn test_adapter_kind() {
        assert_eq!(Runtime::InProcess.adapter_kind(), AdapterKind::Module);
        assert_eq!(Runtime::Native.adapter_kind().to_string(), "native");
    }
}
