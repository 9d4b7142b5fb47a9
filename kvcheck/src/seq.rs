use crate::{Error, Opt, PathRead, Stage};
use konverti::error::Error as KvError;
use konverti::pre::parse::Phrases;
use konverti::{Command, Signature, Symbols, Typing};
use std::convert::TryFrom;

fn infer_check(
    cmd: Command,
    check: bool,
    syms: &mut Symbols,
    sig: &mut Signature,
) -> Result<(), KvError> {
    match cmd {
        Command::Intro(id, it) => {
            let mut typing = Typing::intro(it, sig)?;
            if check {
                typing = typing.check(sig)?;
            }
            let sym = syms.insert(id)?;
            Ok(sig.insert(&sym, typing)?)
        }
        Command::Rule(rule) => {
            if check {
                let postponed = Typing::rewrite(&rule, sig)?;
                if !postponed.is_empty() {
                    log::debug!("assuming {} postponed constraints", postponed.len());
                }
            }
            Ok(sig.add_rule(rule)?)
        }
    }
}

pub fn run(opt: &Opt) -> Result<(), Error> {
    let mut syms = Symbols::new();
    let mut sig = Signature::new();

    for file in opt.files.iter() {
        let file = PathRead::try_from(file)?;
        syms.set_path(file.path);

        for cmd in Phrases::new(&file.read) {
            let cmd = cmd.map_err(|e| Error::Kv(KvError::from(e)))?;
            if opt.omits(Stage::Scope) {
                continue;
            }
            let cmd = Command::scope(cmd, &syms).map_err(KvError::from)?;
            if opt.omits(Stage::Infer) {
                // register the name so that later commands still scope
                if let Command::Intro(id, _) = cmd {
                    syms.insert(id).map_err(KvError::from)?;
                }
                continue;
            }
            infer_check(cmd, !opt.omits(Stage::Check), &mut syms, &mut sig)?;
        }
    }
    Ok(())
}
