//! Command registry entries and dispatch
//!
//! A registry is a static slice of [`AtCommand`] entries. Each entry names a
//! command (`"+COPS"`, `"E0"`, or `""` for a bare `AT`) and supplies an
//! optional handler for each of the four access forms:
//!
//! - `AT<cmd>` — exec
//! - `AT<cmd>?` — read
//! - `AT<cmd>=?` — test
//! - `AT<cmd>=<param>` — write

use crate::error::{CmdError, CmdResult};
use crate::respond::Responder;

/// Handler for the exec/read/test forms.
pub type ExecFn<C> = fn(&mut Responder<'_>, &mut C) -> CmdResult;

/// Handler for the write form; receives the text after `=`.
pub type WriteFn<C> = fn(&mut Responder<'_>, &str, &mut C) -> CmdResult;

/// One registry entry: a command name plus per-form handlers.
pub struct AtCommand<C> {
    /// Command name, matched case-insensitively against the line prefix
    pub name: &'static str,
    pub exec: Option<ExecFn<C>>,
    pub read: Option<ExecFn<C>>,
    pub test: Option<ExecFn<C>>,
    pub write: Option<WriteFn<C>>,
}

impl<C> AtCommand<C> {
    /// Entry with no handlers; fill in the forms the command supports.
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            exec: None,
            read: None,
            test: None,
            write: None,
        }
    }
}

/// Resolve a command line against a table and invoke the matching handler.
///
/// The line is split at the first `=` or `?` into the command name and the
/// access-form suffix. A missing entry and an entry lacking the requested
/// handler both come back as [`CmdError::Unsupported`], so a caller holding
/// a fallback table treats them alike.
pub(crate) fn dispatch<C>(
    table: &[AtCommand<C>],
    line: &[u8],
    resp: &mut Responder<'_>,
    ctx: &mut C,
) -> CmdResult {
    let plen = line
        .iter()
        .position(|&b| b == b'=' || b == b'?')
        .unwrap_or(line.len());
    let (prefix, rest) = line.split_at(plen);

    let cmd = table
        .iter()
        .find(|c| c.name.as_bytes().eq_ignore_ascii_case(prefix))
        .ok_or(CmdError::Unsupported)?;

    match rest {
        b"" => cmd.exec.ok_or(CmdError::Unsupported)?(resp, ctx),
        b"?" => cmd.read.ok_or(CmdError::Unsupported)?(resp, ctx),
        b"=?" => cmd.test.ok_or(CmdError::Unsupported)?(resp, ctx),
        _ => {
            let param =
                std::str::from_utf8(&rest[1..]).map_err(|_| CmdError::InvalidParameter)?;
            cmd.write.ok_or(CmdError::Unsupported)?(resp, param, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        execs: u32,
        last_param: Option<String>,
    }

    fn exec(_resp: &mut Responder<'_>, ctx: &mut Ctx) -> CmdResult {
        ctx.execs += 1;
        Ok(())
    }

    fn write(_resp: &mut Responder<'_>, param: &str, ctx: &mut Ctx) -> CmdResult {
        ctx.last_param = Some(param.to_string());
        Ok(())
    }

    static TABLE: [AtCommand<Ctx>; 2] = [
        AtCommand {
            exec: Some(exec),
            write: Some(write),
            ..AtCommand::named("+TEST")
        },
        AtCommand {
            exec: Some(exec),
            ..AtCommand::named("")
        },
    ];

    fn run(line: &[u8], ctx: &mut Ctx) -> CmdResult {
        let mut out = Vec::new();
        let mut resp = Responder::new(&mut out);
        dispatch(&TABLE, line, &mut resp, ctx)
    }

    fn ctx() -> Ctx {
        Ctx {
            execs: 0,
            last_param: None,
        }
    }

    #[test]
    fn test_dispatch_exec() {
        let mut c = ctx();
        run(b"+TEST", &mut c).unwrap();
        assert_eq!(c.execs, 1);
    }

    #[test]
    fn test_dispatch_case_insensitive() {
        let mut c = ctx();
        run(b"+test", &mut c).unwrap();
        assert_eq!(c.execs, 1);
    }

    #[test]
    fn test_dispatch_write_param() {
        let mut c = ctx();
        run(b"+TEST=3,2", &mut c).unwrap();
        assert_eq!(c.last_param.as_deref(), Some("3,2"));
    }

    #[test]
    fn test_dispatch_empty_name_matches_bare_line() {
        let mut c = ctx();
        run(b"", &mut c).unwrap();
        assert_eq!(c.execs, 1);
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let mut c = ctx();
        assert!(matches!(
            run(b"+NOPE", &mut c),
            Err(CmdError::Unsupported)
        ));
    }

    #[test]
    fn test_dispatch_missing_form_is_unsupported() {
        // +TEST has no read handler
        let mut c = ctx();
        assert!(matches!(
            run(b"+TEST?", &mut c),
            Err(CmdError::Unsupported)
        ));
    }

    #[test]
    fn test_dispatch_exact_length_match() {
        // "+TESTX" must not match the "+TEST" entry
        let mut c = ctx();
        assert!(matches!(
            run(b"+TESTX", &mut c),
            Err(CmdError::Unsupported)
        ));
    }
}
