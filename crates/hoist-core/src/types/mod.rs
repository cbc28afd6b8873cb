//! Opaque handles exchanged with the remote execution environment.
//!
//! Handles are only ever produced by a remote service (or the reference
//! bundle) and passed back unchanged; the orchestrator never inspects them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_handle!(
    /// Identifies a piece of installed code. Reusable for any number of instances.
    InstallationHandle
);

opaque_handle!(
    /// Identifies a class of resource recognized by the wallet.
    IssuerHandle
);

opaque_handle!(
    /// Reference to the timer service handed to new instances.
    TimerServiceRef
);

opaque_handle!(
    /// Control over a freshly created instance.
    AdminInvite
);

opaque_handle!(
    /// Globally unique key under which an installation is published.
    RegistryKey
);
