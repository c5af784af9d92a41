mod cli;

use anyhow::Result;

pub(crate) use cli::as_cli;

/// Global flags followed by the command and its own arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Invocation {
    pub(crate) db: Option<String>,
    pub(crate) user: Option<String>,
    pub(crate) demo: bool,
    pub(crate) command: Vec<String>,
}

impl Invocation {
    /// Parse arguments (without the program name). Global flags must come
    /// before the command.
    pub(crate) fn parse(args: &[String]) -> Result<Self> {
        let mut inv = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--db requires a path"))?;
                    inv.db = Some(path.clone());
                }
                "--user" | "-u" => {
                    let user = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--user requires a name"))?;
                    inv.user = Some(user.clone());
                }
                "--demo" => inv.demo = true,
                _ => {
                    inv.command.push(arg.clone());
                    inv.command.extend(iter.by_ref().cloned());
                }
            }
        }
        Ok(inv)
    }
}
