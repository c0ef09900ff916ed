/// Declares the fixed single-register addresses of the unit.
///
/// For every `name = offset, Access;` entry this generates an upper-case
/// offset constant, a camel-case [`Register`](super::map::Register) variant
/// and the matching arms of `offset()`, `access()` and `decode()`.
macro_rules! register_map {
    ($( $(#[$meta:meta])* $name:ident = $offset:literal, $access:ident; )*) => {
        paste::paste! {
            $(
                $(#[$meta])*
                pub const [<$name:upper>]: u16 = $offset;
            )*

            /// Fixed single-register addresses of the unit.
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum Register {
                $( $(#[$meta])* [<$name:camel>], )*
            }

            impl Register {
                /// Every fixed register, in address order.
                pub const ALL: &'static [Register] = &[$( Register::[<$name:camel>], )*];

                /// Byte offset relative to the unit's base.
                pub const fn offset(self) -> u16 {
                    match self {
                        $( Register::[<$name:camel>] => $offset, )*
                    }
                }

                pub const fn access(self) -> Access {
                    match self {
                        $( Register::[<$name:camel>] => Access::$access, )*
                    }
                }

                /// Looks up the register at `offset`, if any.
                pub const fn decode(offset: u16) -> Option<Self> {
                    match offset {
                        $( $offset => Some(Register::[<$name:camel>]), )*
                        _ => None,
                    }
                }
            }
        }
    };
}

pub(super) use register_map;
