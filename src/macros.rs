//! Macros for declaring lifecycle phases.

/// Declare a fieldless enum and implement [`State`](crate::core::State) and
/// `Display` for it.
///
/// Variants listed under `final:` are terminal. Extra attributes (such as
/// `#[derive(Copy, Eq)]`) are passed through.
///
/// # Example
///
/// ```
/// use tickwidget::state_enum;
/// use tickwidget::core::State;
///
/// state_enum! {
///     #[derive(Copy)]
///     pub enum Door {
///         Closed,
///         Open,
///         Bricked,
///     }
///     final: [Bricked]
/// }
///
/// assert_eq!(Door::Open.to_string(), "Open");
/// assert!(Door::Bricked.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    crate::state_enum! {
        enum Job {
            Queued,
            Running,
            Done,
            Cancelled,
        }
        final: [Done, Cancelled]
    }

    #[test]
    fn generates_state_impl() {
        assert_eq!(Job::Queued.name(), "Queued");
        assert!(!Job::Running.is_final());
        assert!(Job::Done.is_final());
        assert!(Job::Cancelled.is_final());
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(Job::Running.to_string(), "Running");
    }

    #[test]
    fn lists_are_optional() {
        crate::state_enum! {
            enum Toggle {
                Off,
                On,
            }
        }

        assert!(!Toggle::On.is_final());
        assert!(!Toggle::Off.is_final());
    }
}
