use std::collections::BTreeMap;

/// Short flag aliases, `-u` is `--url` and so on.
const SHORT_NAMES: &[(&str, &str)] = &[("u", "url"), ("o", "out")];

/// Options that take a value. Any flag not listed here is a switch.
pub const FLAG_SCHEMA: &[FlagSpec] = &[
    FlagSpec {
        name: "url",
        expects_value: true,
    },
    FlagSpec {
        name: "out",
        expects_value: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: &'static str,
    pub expects_value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// present without a value
    Switch,
    Value(String),
}

impl FlagValue {
    /// The string value, `None` for a bare switch.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            FlagValue::Value(value) => Some(value),
            FlagValue::Switch => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flags {
    pub url: Option<FlagValue>,
    pub out: Option<FlagValue>,
    /// every other flag, keyed by canonical name
    pub switches: BTreeMap<String, FlagValue>,
}

impl Flags {
    fn set(&mut self, key: String, value: FlagValue) {
        match key.as_str() {
            "url" => self.url = Some(value),
            "out" => self.out = Some(value),
            _ => {
                self.switches.insert(key, value);
            }
        }
    }

    /// Lookup by canonical name.
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        match key {
            "url" => self.url.as_ref(),
            "out" => self.out.as_ref(),
            _ => self.switches.get(key),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_ref().and_then(FlagValue::as_value)
    }

    pub fn out(&self) -> Option<&str> {
        self.out.as_ref().and_then(FlagValue::as_value)
    }

    pub fn len(&self) -> usize {
        self.url.is_some() as usize + self.out.is_some() as usize + self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub args: Vec<String>,
    pub flags: Flags,
}

/// Maps `-u`, `--url`, `-x`, `--fast` to `url`, `url`, `x`, `fast`.
pub fn canonical_name(token: &str) -> &str {
    let key = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);

    if key.chars().count() == 1 {
        SHORT_NAMES
            .iter()
            .find(|(short, _)| *short == key)
            .map_or(key, |&(_, long)| long)
    } else {
        key
    }
}

fn spec_of(name: &str) -> Option<&'static FlagSpec> {
    FLAG_SCHEMA.iter().find(|spec| spec.name == name)
}

/// Canonical name of `token` if it is a flag trigger.
///
/// `-` and `--` alone carry no name and are positional.
fn flag_key(token: &str) -> Option<&str> {
    if !token.starts_with('-') {
        return None;
    }
    let key = canonical_name(token);
    (!key.is_empty()).then_some(key)
}

/// Splits raw arguments (program name already stripped) into positionals
/// and flags. Never fails.
pub fn parse_argv<I, S>(argv: I) -> Parsed
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let mut parsed = Parsed::default();

    let mut i = 0;
    while i < argv.len() {
        let token = &argv[i];
        let Some(key) = flag_key(token) else {
            parsed.args.push(token.clone());
            i += 1;
            continue;
        };

        let expects_value = spec_of(key).is_some_and(|spec| spec.expects_value);
        // known options and `--long` flags are never swallowed as a value,
        // other hyphen tokens (`-5`, `-weird`) are
        let candidate = argv.get(i + 1).filter(|next| {
            !flag_key(next)
                .is_some_and(|next_key| next.starts_with("--") || spec_of(next_key).is_some())
        });

        match candidate {
            Some(value) if expects_value => {
                parsed
                    .flags
                    .set(key.to_owned(), FlagValue::Value(value.clone()));
                i += 2;
            }
            _ => {
                parsed.flags.set(key.to_owned(), FlagValue::Switch);
                i += 1;
            }
        }
    }

    parsed
}
