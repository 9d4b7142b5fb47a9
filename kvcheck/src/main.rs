//! A typechecker for the lambda-Pi calculus modulo rewriting.

use structopt::StructOpt;

mod error;
mod opt;
mod path_read;
mod seq;

pub use error::Error;
pub use opt::{Opt, Stage};
pub use path_read::PathRead;

fn main() -> Result<(), Error> {
    use env_logger::Env;
    // log warnings and errors by default
    // allow setting the logging level by using the environment variable "LOG"
    // e.g. `LOG=konverti::reduce=trace kvcheck ...`
    env_logger::Builder::from_env(Env::default().filter_or("LOG", "warn")).init();

    let opt = Opt::from_args();
    seq::run(&opt)
}
