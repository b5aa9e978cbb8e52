//! Helper macro generating port error enums.
//!
//! Every variant names the [`ErrorCode`](crate::domain::ErrorCode) it maps
//! to, so each generated enum converts into a domain [`Error`] with `?`.
//!
//! [`Error`]: crate::domain::Error

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $code:ident : $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Domain error code this failure surfaces as.
            pub fn error_code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $( Self::$variant { .. } => $crate::domain::ErrorCode::$code, )*
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(err: $name) -> Self {
                $crate::domain::Error::new(err.error_code(), err.to_string())
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum SamplePortError {
            Offline { message: String } => ServiceUnavailable: "offline: {message}",
            Taken { count: u32 } => Conflict: "taken: {count}",
            Broken { message: String, count: u32 } => InternalError: "broken: {message} ({count})",
            Gone => NotFound: "gone",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::offline("db down");
        assert_eq!(err.to_string(), "offline: db down");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SamplePortError::taken(42_u32);
        assert_eq!(err.to_string(), "taken: 42");
    }

    #[test]
    fn constructors_support_mixed_and_unit_variants() {
        assert_eq!(
            SamplePortError::broken("oops", 3_u32).to_string(),
            "broken: oops (3)"
        );
        assert_eq!(SamplePortError::gone(), SamplePortError::Gone);
    }

    #[test]
    fn variants_convert_into_their_declared_codes() {
        let cases = [
            (SamplePortError::offline("x"), ErrorCode::ServiceUnavailable),
            (SamplePortError::taken(1_u32), ErrorCode::Conflict),
            (SamplePortError::broken("x", 1_u32), ErrorCode::InternalError),
            (SamplePortError::gone(), ErrorCode::NotFound),
        ];
        for (err, expected) in cases {
            let message = err.to_string();
            let domain = Error::from(err);
            assert_eq!(domain.code(), expected);
            assert_eq!(domain.message(), message);
        }
    }
}
