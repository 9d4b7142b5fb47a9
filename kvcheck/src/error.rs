use konverti as kv;
use std::io;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Module,
    Io(io::Error),
    Kv(kv::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<kv::Error> for Error {
    fn from(err: kv::Error) -> Self {
        Self::Kv(err)
    }
}
