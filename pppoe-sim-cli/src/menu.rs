//! Interactive interface menu and credential banner

use pppoe_sim_capture::InterfaceInfo;
use pppoe_sim_server::Credentials;
use std::io::{self, BufRead, Write};

/// Print the numbered interface list
pub fn print_interfaces<W: Write>(interfaces: &[InterfaceInfo], out: &mut W) -> io::Result<()> {
    writeln!(out, "Active interfaces:")?;
    for (i, iface) in interfaces.iter().enumerate() {
        writeln!(out, "{}    {}", i + 1, iface)?;
    }
    Ok(())
}

/// Parse a 1-based menu answer
pub fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let index: usize = answer.trim().parse().ok()?;
    (1..=count).contains(&index).then(|| index - 1)
}

/// Prompt until a valid interface is picked. `None` on end of input.
pub fn choose_interface<R: BufRead, W: Write>(
    interfaces: &[InterfaceInfo],
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<InterfaceInfo>> {
    loop {
        writeln!(out)?;
        print_interfaces(interfaces, out)?;
        writeln!(out)?;
        write!(out, "Select an interface: ")?;
        out.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        if let Some(index) = parse_choice(&answer, interfaces.len()) {
            return Ok(Some(interfaces[index].clone()));
        }
    }
}

/// Block until Enter. `false` on end of input.
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    write!(out, "Press Enter to continue...")?;
    out.flush()?;
    let mut line = String::new();
    Ok(input.read_line(&mut line)? > 0)
}

/// Framed credential block, `None` when nothing was captured
pub fn credential_banner(credentials: &Credentials, captured_at: &str) -> Option<String> {
    if credentials.peer_id.is_empty() {
        return None;
    }

    let width = credentials
        .peer_id
        .chars()
        .count()
        .max(credentials.secret.chars().count())
        + 10;
    let separator = "=".repeat(width);

    Some(format!(
        "{separator}\nPPPoE credentials ({captured_at})\n\nUsername: {}\nPassword: {}\n{separator}",
        credentials.peer_id, credentials.secret
    ))
}
