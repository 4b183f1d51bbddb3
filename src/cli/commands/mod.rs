//! One module per `fieldseal` subcommand, each exposing `execute`.

pub mod bench;
pub mod completions;
pub mod decrypt;
pub mod demo;
pub mod encrypt;
pub mod handle;
pub mod inspect;
pub mod keygen;
pub mod keys;
pub mod version;
