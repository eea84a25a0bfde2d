//! Macros for declaring state enums.

/// Declare a state enum together with its [`State`](crate::core::State)
/// implementation, a `Display` impl and an `ALL` constant listing every
/// variant in declaration order.
///
/// # Example
///
/// ```
/// use ticket_terminal::machine_states;
/// use ticket_terminal::core::State;
///
/// machine_states! {
///     pub enum PrinterState {
///         Ready,
///         Feeding,
///         Done,
///         Jammed,
///     }
///     final: [Done, Jammed]
///     error: [Jammed]
///     transient: [Feeding]
/// }
///
/// assert_eq!(PrinterState::ALL.len(), 4);
/// assert!(PrinterState::Feeding.is_transient());
/// assert_eq!(PrinterState::Jammed.to_string(), "Jammed");
/// ```
#[macro_export]
macro_rules! machine_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
        $(transient: [$($transient:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_transient(&self) -> bool {
                match self {
                    $($(Self::$transient => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
