use std::path::PathBuf;
use structopt::StructOpt;

/// A typechecker for the lambda-Pi calculus modulo rewriting
#[derive(Clone, Debug, StructOpt)]
pub struct Opt {
    /// Perform only operations until (excluding) the given stage.
    ///
    /// Possible values are: scope, infer, check.
    #[structopt(long)]
    pub omit: Option<Stage>,

    /// Files to process (cumulative)
    ///
    /// Every file is wrapped in a module corresponding to the file path.
    /// To read from standard input, use "-" as file name.
    #[structopt(name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Scope,
    Infer,
    Check,
}

impl core::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scope" => Ok(Self::Scope),
            "infer" => Ok(Self::Infer),
            "check" => Ok(Self::Check),
            _ => Err(format!("unknown stage: {}", s)),
        }
    }
}

impl Opt {
    pub fn omits(&self, stage: Stage) -> bool {
        self.omit == Some(stage)
    }
}
