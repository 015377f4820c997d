//! Interactive prompts on a line-oriented terminal.

use super::selection::parse_selection_input;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use tabula_discord::{Channel, Guild};
use tabula_purge::ExclusionSet;

const TOKEN_HELP: &str = "\
Discord no longer supports username/password login via the API.
You need to provide your user token instead.

  1. Open Discord in your browser (discord.com)
  2. Press F12 to open Developer Tools
  3. Go to the Network tab and filter for 'api'
  4. Click any request to discord.com/api/...
  5. Under Headers, copy the 'authorization' value

Or set the DISCORD_TOKEN environment variable.
";

/// Strip whitespace and quotes that commonly surround a pasted token.
pub fn clean_token(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .to_string()
}

/// Reads answers from `input` and writes questions to `output`.
///
/// End of input answers every question negatively: no token, no
/// exclusions, no confirmation.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Ask for the user token; returns it cleaned, possibly empty.
    pub fn token(&mut self) -> io::Result<String> {
        writeln!(self.output, "{}", TOKEN_HELP)?;
        let answer = self.ask("Enter your Discord user token: ")?;
        Ok(answer.as_deref().map(clean_token).unwrap_or_default())
    }

    /// Yes/no question; only `y` or `yes` confirm.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(prompt)?.unwrap_or_default();
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    /// Ask for a selection over `1..=max` until the answer parses.
    pub fn select(&mut self, prompt: &str, max: usize) -> io::Result<BTreeSet<usize>> {
        if max == 0 {
            return Ok(BTreeSet::new());
        }

        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(BTreeSet::new());
            };
            match parse_selection_input(&answer, max) {
                Ok(selected) => return Ok(selected),
                Err(e) => writeln!(self.output, "Invalid selection: {}", e)?,
            }
        }
    }

    /// List servers and conversations and ask which to leave alone.
    pub fn exclusions(
        &mut self,
        guilds: &[Guild],
        conversations: &[Channel],
    ) -> io::Result<ExclusionSet> {
        let mut exclusions = ExclusionSet::new();

        writeln!(self.output, "Optional scope selection")?;
        writeln!(
            self.output,
            "By default the purge covers everything reachable on your account."
        )?;
        writeln!(self.output)?;

        if guilds.is_empty() {
            writeln!(self.output, "No servers found to list for exclusion.")?;
        } else {
            writeln!(self.output, "Servers:")?;
            for (index, guild) in guilds.iter().enumerate() {
                writeln!(
                    self.output,
                    "  [{}] {} (ID: {})",
                    index + 1,
                    guild.display_name(),
                    guild.id()
                )?;
            }
            writeln!(self.output)?;

            let selected = self.select(
                "Enter server numbers to EXCLUDE (e.g. 1,3-5) or press Enter for none: ",
                guilds.len(),
            )?;
            for index in selected {
                exclusions.exclude_guild(guilds[index - 1].id().as_str());
            }
        }
        writeln!(self.output)?;

        if conversations.is_empty() {
            writeln!(self.output, "No open conversations found to list for exclusion.")?;
        } else {
            writeln!(self.output, "Open conversations:")?;
            for (index, channel) in conversations.iter().enumerate() {
                writeln!(
                    self.output,
                    "  [{}] {}: {} (ID: {})",
                    index + 1,
                    channel.kind(),
                    channel.label(),
                    channel.id()
                )?;
            }
            writeln!(self.output)?;

            let selected = self.select(
                "Enter conversation numbers to EXCLUDE (e.g. 2,4-6) or press Enter for none: ",
                conversations.len(),
            )?;
            for index in selected {
                exclusions.exclude_conversation(conversations[index - 1].id().as_str());
            }
        }
        writeln!(self.output)?;

        writeln!(
            self.output,
            "Exclusions selected: {} servers, {} conversations.",
            exclusions.guild_count(),
            exclusions.conversation_count()
        )?;
        if !exclusions.is_empty() {
            writeln!(
                self.output,
                "Excluded items are skipped during message deletion and reaction removal."
            )?;
        }
        writeln!(self.output)?;

        Ok(exclusions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_clean_token_strips_quotes_and_whitespace() {
        assert_eq!(clean_token("  \"abc.def\"\r\n"), "abc.def");
        assert_eq!(clean_token("'abc'"), "abc");
        assert_eq!(clean_token(" \t\n"), "");
    }

    #[test]
    fn test_token_prompt() {
        assert_eq!(prompter("\"tok\"\n").token().unwrap(), "tok");
        assert_eq!(prompter("").token().unwrap(), "");
    }

    #[test]
    fn test_confirm_accepts_only_yes() {
        assert!(prompter("yes\n").confirm("? ").unwrap());
        assert!(prompter(" Y \n").confirm("? ").unwrap());
        assert!(!prompter("yeah\n").confirm("? ").unwrap());
        assert!(!prompter("").confirm("? ").unwrap());
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let mut prompter = prompter("9\nfoo\n2-3\n");

        let selected = prompter.select("pick: ", 3).unwrap();

        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![2, 3]);
        let output = String::from_utf8(prompter.output).unwrap();
        assert_eq!(output.matches("pick: ").count(), 3);
        assert!(output.contains("selection 9 is out of bounds (1-3)"));
    }

    #[test]
    fn test_exclusions_map_numbers_to_ids() {
        let guilds = vec![Guild::new("g1", "Alpha"), Guild::new("g2", "")];
        let mut prompter = prompter("2\n\n");

        let exclusions = prompter.exclusions(&guilds, &[]).unwrap();

        assert!(exclusions.is_guild_excluded("g2"));
        assert!(!exclusions.is_guild_excluded("g1"));
        assert_eq!(exclusions.conversation_count(), 0);
        let output = String::from_utf8(prompter.output).unwrap();
        assert!(output.contains("[2] g2 (ID: g2)"));
    }
}
