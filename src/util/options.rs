use std::default::Default;
use strum_macros::EnumString;

/// Which barrier a mutator uses.
#[derive(Copy, Clone, EnumString, Debug, PartialEq, Eq)]
pub enum BarrierSelector {
    /// No barrier. Reference stores never mark anything. Use this when the collector does not
    /// mark concurrently with mutators.
    NoBarrier,
    /// The concurrent mark-sweep barrier: marks the overwritten value during root computation and
    /// tracing, and the stored value as well during root computation.
    SlidingViews,
}

fn always_valid<T>(_: &T) -> bool {
    true
}

/// The prefix of environment variables that set options, such as `CMSMARK_COUNT_BARRIER_EVENTS`.
pub const ENV_VAR_PREFIX: &str = "CMSMARK_";

macro_rules! options {
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($(#[$outer])* $name: $type[$validator] = $default),*);
    ];
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        /// Options for a marking engine.
        #[derive(Clone, Debug)]
        pub struct Options {
            $($(#[$outer])* pub $name: $type),*
        }
        impl Options {
            /// Create options with the default values, ignoring environment variables.
            pub fn new_with_defaults() -> Self {
                Options {
                    $($name: $default),*
                }
            }

            /// Set an option from a string. The option name is in snake case, e.g. `count_barrier_events`.
            /// Return true if the option is set. Return false (and keep the current value) if the
            /// name is unknown, or if the value cannot be parsed or is invalid.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_option()) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        // Validate
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. Default value will be used.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Cant parse value. Default value will be used.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}={:?}. Ignored.", s, val);
                        false
                    }
                }
            }

            /// Override options from environment variables that start with [`ENV_VAR_PREFIX`].
            /// Environment variables that do not match any option are ignored.
            pub fn read_env_var_settings(&mut self) {
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(ENV_VAR_PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
            }
        }
        impl Default for Options {
            /// The default values, overridden by environment variables.
            fn default() -> Self {
                let mut options = Self::new_with_defaults();
                options.read_env_var_settings();
                options
            }
        }
    ]
}

options! {
    /// The barrier that new mutators use.
    barrier:               BarrierSelector      [always_valid] = BarrierSelector::SlidingViews,
    /// Check that every newly marked object is on a page owned by the marking thread, even in release builds.
    verify_page_ownership: bool                 [always_valid] = false,
    /// Count barrier slow paths and marking outcomes. See `crate::util::statistics`.
    count_barrier_events:  bool                 [always_valid] = false,
}
