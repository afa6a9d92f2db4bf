//! Shift cursor over tokenized process arguments.
//!
//! Consumption is destructive: every token can be shifted at most once, and
//! the lifecycle stages must shift in declaration order (flags, then
//! single-value options, then multi-value options, then positionals) because
//! the cursor is shared down the whole command tree. Leftover tokens after
//! the full tree has run its setup are a validation concern, not ours.

use crate::error::ArgumentError;

/// One tokenized argument.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// `--name` or `--name=value`.
    Long { name: String, value: Option<String> },
    /// A single character out of a `-abc` cluster.
    Short(char),
    /// Anything that is not an option-shaped token.
    Positional(String),
}

#[derive(Debug, Clone)]
struct Slot {
    token: Token,
    consumed: bool,
}

/// Tokenized process arguments with single-owner shift semantics.
///
/// Created once by the dispatcher and passed by exclusive reference through
/// group resolution and every lifecycle stage.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    slots: Vec<Slot>,
    raw: Vec<String>,
}

impl ParsedArgs {
    pub fn new(arguments: &[String]) -> Self {
        let mut slots = Vec::with_capacity(arguments.len());
        for arg in arguments {
            if let Some(rest) = arg.strip_prefix("--") {
                if rest.is_empty() {
                    // A bare `--` is kept positional; nothing downstream
                    // treats it specially.
                    slots.push(Slot {
                        token: Token::Positional(arg.clone()),
                        consumed: false,
                    });
                } else if let Some((name, value)) = rest.split_once('=') {
                    slots.push(Slot {
                        token: Token::Long {
                            name: name.to_string(),
                            value: Some(value.to_string()),
                        },
                        consumed: false,
                    });
                } else {
                    slots.push(Slot {
                        token: Token::Long {
                            name: rest.to_string(),
                            value: None,
                        },
                        consumed: false,
                    });
                }
            } else if let Some(rest) = arg.strip_prefix('-') {
                if rest.is_empty() || rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                    // `-` alone and negative numbers stay positional.
                    slots.push(Slot {
                        token: Token::Positional(arg.clone()),
                        consumed: false,
                    });
                } else {
                    for c in rest.chars() {
                        slots.push(Slot {
                            token: Token::Short(c),
                            consumed: false,
                        });
                    }
                }
            } else {
                slots.push(Slot {
                    token: Token::Positional(arg.clone()),
                    consumed: false,
                });
            }
        }
        Self {
            slots,
            raw: arguments.to_vec(),
        }
    }

    /// The untouched argv, for the session banner.
    pub fn raw_description(&self) -> String {
        self.raw.join(" ")
    }

    /// Consume a boolean flag. Matches `--long` (valueless) or `-s`.
    pub fn shift_flag(&mut self, long: &str, short: Option<char>) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.consumed {
                continue;
            }
            let hit = match &slot.token {
                Token::Long { name, value: None } => name == long,
                Token::Short(c) => short == Some(*c),
                _ => false,
            };
            if hit {
                slot.consumed = true;
                return true;
            }
        }
        false
    }

    /// Consume a single-value option: `--name value` or `--name=value`.
    ///
    /// `Ok(None)` when the option is absent; an error when it is present
    /// without a usable value.
    pub fn shift_option(&mut self, name: &str) -> Result<Option<String>, ArgumentError> {
        match self.shift_option_at(name)? {
            Some((_, value)) => Ok(Some(value)),
            None => Ok(None),
        }
    }

    /// Consume every occurrence of a repeatable option, in argv order.
    /// `Ok(None)` when it never appears.
    pub fn shift_options(&mut self, name: &str) -> Result<Option<Vec<String>>, ArgumentError> {
        let mut values = Vec::new();
        while let Some((_, value)) = self.shift_option_at(name)? {
            values.push(value);
        }
        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(values))
        }
    }

    /// Consume the next positional argument.
    pub fn shift_argument(&mut self) -> Option<String> {
        for slot in self.slots.iter_mut() {
            if slot.consumed {
                continue;
            }
            if let Token::Positional(value) = &slot.token {
                let value = value.clone();
                slot.consumed = true;
                return Some(value);
            }
        }
        None
    }

    /// Consume all remaining positional arguments, in argv order.
    pub fn shift_arguments(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(arg) = self.shift_argument() {
            out.push(arg);
        }
        out
    }

    /// Next unconsumed positional without consuming it.
    pub fn peek_argument(&self) -> Option<&str> {
        self.slots.iter().find_map(|slot| match &slot.token {
            Token::Positional(value) if !slot.consumed => Some(value.as_str()),
            _ => None,
        })
    }

    /// Unconsumed tokens rendered back to strings, for leftover checks.
    pub fn leftover(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| !slot.consumed)
            .map(|slot| match &slot.token {
                Token::Long { name, value: None } => format!("--{name}"),
                Token::Long {
                    name,
                    value: Some(v),
                } => format!("--{name}={v}"),
                Token::Short(c) => format!("-{c}"),
                Token::Positional(v) => v.clone(),
            })
            .collect()
    }

    fn shift_option_at(
        &mut self,
        name: &str,
    ) -> Result<Option<(usize, String)>, ArgumentError> {
        let found = self.slots.iter().enumerate().find_map(|(i, slot)| {
            match (&slot.token, slot.consumed) {
                (Token::Long { name: n, value }, false) if n == name => {
                    Some((i, value.clone()))
                }
                _ => None,
            }
        });
        let Some((index, inline)) = found else {
            return Ok(None);
        };
        self.slots[index].consumed = true;
        if let Some(value) = inline {
            return Ok(Some((index, value)));
        }
        // Value form `--name value`: the very next unconsumed token must be
        // positional-shaped, otherwise the option has no value.
        for slot in self.slots[index + 1..].iter_mut() {
            if slot.consumed {
                continue;
            }
            if let Token::Positional(value) = &slot.token {
                let value = value.clone();
                slot.consumed = true;
                return Ok(Some((index, value)));
            }
            break;
        }
        Err(ArgumentError::MissingValue(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shift_flag_consumes_once() {
        let mut args = ParsedArgs::new(&argv(&["--all", "-v"]));
        assert!(args.shift_flag("all", None));
        assert!(!args.shift_flag("all", None));
        assert!(args.shift_flag("verbose", Some('v')));
    }

    #[test]
    fn shift_option_takes_following_token() {
        let mut args = ParsedArgs::new(&argv(&["--script", "python", "rest"]));
        assert_eq!(args.shift_option("script").unwrap().as_deref(), Some("python"));
        assert_eq!(args.shift_argument().as_deref(), Some("rest"));
    }

    #[test]
    fn shift_option_inline_value() {
        let mut args = ParsedArgs::new(&argv(&["--root=/tmp/x"]));
        assert_eq!(args.shift_option("root").unwrap().as_deref(), Some("/tmp/x"));
    }

    #[test]
    fn shift_option_missing_value_errors() {
        let mut args = ParsedArgs::new(&argv(&["--script", "--all"]));
        assert_eq!(
            args.shift_option("script"),
            Err(ArgumentError::MissingValue("script".into()))
        );
    }

    #[test]
    fn shift_options_collects_in_order() {
        let mut args = ParsedArgs::new(&argv(&["--role", "qa", "--role", "dev"]));
        assert_eq!(
            args.shift_options("role").unwrap(),
            Some(vec!["qa".to_string(), "dev".to_string()])
        );
        assert_eq!(args.shift_options("role").unwrap(), None);
    }

    #[test]
    fn positional_order_is_stable() {
        let mut args = ParsedArgs::new(&argv(&["plugin", "--all", "launch", "foo/bar"]));
        assert_eq!(args.shift_argument().as_deref(), Some("plugin"));
        assert_eq!(args.shift_argument().as_deref(), Some("launch"));
        assert!(args.shift_flag("all", None));
        assert_eq!(args.shift_arguments(), vec!["foo/bar".to_string()]);
    }

    #[test]
    fn short_cluster_expands() {
        let mut args = ParsedArgs::new(&argv(&["-va"]));
        assert!(args.shift_flag("verbose", Some('v')));
        assert!(args.shift_flag("all", Some('a')));
    }

    #[test]
    fn leftover_reports_unconsumed() {
        let mut args = ParsedArgs::new(&argv(&["list", "--junk"]));
        let _ = args.shift_argument();
        assert_eq!(args.leftover(), vec!["--junk".to_string()]);
    }
}
