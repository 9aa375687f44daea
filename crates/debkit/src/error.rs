//! Error types for Debian package operations.
//!
//! Installer failures are categorized from apt's stderr so the caller can
//! print something more useful than the raw output. Categories are for
//! reporting only; nothing in this crate retries.

use thiserror::Error;

/// Categories of package errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Mirror unreachable, DNS failure, fetch errors
    Network,
    /// Package not known to apt
    NotFound,
    /// dpkg or apt lock held by another process
    Locked,
    /// Not running as root, sudo refused
    Permission,
    /// Package name rejected before running anything
    InvalidName,
    /// Could not reach the host at all
    Transport,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Package not found",
            Self::Locked => "Package database locked",
            Self::Permission => "Permission denied",
            Self::InvalidName => "Invalid package name",
            Self::Transport => "Host unreachable",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the host's network and apt sources, then run again",
            Self::NotFound => "Verify the package name or run `apt-get update` on the host",
            Self::Locked => "Wait for the other apt/dpkg process on the host to finish",
            Self::Permission => "Make sure the connecting user may run apt-get through sudo",
            Self::InvalidName => "Package names use lowercase letters, digits, '+', '-' and '.'",
            Self::Transport => "Check that the host is reachable over ssh",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur during package operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error while fetching packages
    #[error("network error: {message}")]
    Network {
        /// Detailed error message from apt
        message: String,
    },

    /// Package not known to apt
    #[error("package not found: {name}")]
    NotFound {
        /// Name of the package that could not be found
        name: String,
    },

    /// dpkg/apt lock is held
    #[error("package database locked: {message}")]
    Locked {
        /// apt's lock message
        message: String,
    },

    /// Permission denied
    #[error("permission denied: {message}")]
    Permission {
        /// Details about what permission was denied
        message: String,
    },

    /// Package name rejected before any command ran
    #[error("invalid package name: {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// The installer exited non-zero for another reason
    #[error("{message}")]
    CommandFailed {
        /// What command failed
        message: String,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// The shell could not run the command at all
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Locked { .. } => ErrorCategory::Locked,
            Error::Permission { .. } => ErrorCategory::Permission,
            Error::InvalidName { .. } => ErrorCategory::InvalidName,
            Error::Transport(_) => ErrorCategory::Transport,
            Error::CommandFailed { .. } => ErrorCategory::Other,
        }
    }

    /// Whether this error came from the installer itself exiting non-zero.
    pub fn is_installation_error(&self) -> bool {
        !matches!(self, Error::InvalidName { .. } | Error::Transport(_))
    }

    /// Create an error from apt-get output.
    ///
    /// Analyzes stderr to categorize the error appropriately.
    pub fn from_apt_output(stderr: &str, package_name: &str, action: &str) -> Self {
        let stderr_lower = stderr.to_lowercase();

        if stderr_lower.contains("unable to locate package")
            || stderr_lower.contains("has no installation candidate")
        {
            return Error::NotFound {
                name: package_name.to_string(),
            };
        }

        if stderr_lower.contains("could not get lock")
            || stderr_lower.contains("unable to lock")
            || stderr_lower.contains("is another process using it")
        {
            return Error::Locked {
                message: stderr.trim().to_string(),
            };
        }

        if stderr_lower.contains("are you root")
            || stderr_lower.contains("permission denied")
            || stderr_lower.contains("is not in the sudoers file")
            || stderr_lower.contains("a password is required")
        {
            return Error::Permission {
                message: stderr.trim().to_string(),
            };
        }

        if stderr_lower.contains("could not resolve")
            || stderr_lower.contains("temporary failure resolving")
            || stderr_lower.contains("failed to fetch")
            || stderr_lower.contains("connection timed out")
            || stderr_lower.contains("network is unreachable")
        {
            return Error::Network {
                message: stderr.trim().to_string(),
            };
        }

        Error::CommandFailed {
            message: format!("apt-get {action} failed for {package_name}"),
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;
