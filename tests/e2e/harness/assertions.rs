use anyhow::Result;
use journal_core::Fields;
use serde_json::Value;

/// Declarative assertions on the replayed journal
pub enum Assertion {
    // Shape
    EntryCount(usize),
    /// One string per entry: `BEGIN:<title>`, `END`, or `<LEVEL>:<_value>`
    Shape(Vec<String>),
    FieldEquals {
        index: usize,
        key: String,
        value: Value,
    },
    FieldAbsent {
        index: usize,
        key: String,
    },
    NoEntryWithValue(String),

    // Ordering
    TimestampsStrictlyIncreasing,
    TimestampsFrom {
        start: u64,
    },

    // Structure
    WellFormed,
    UnclosedContexts(usize),
    ThreadCount(usize),
    AllOnCallingThread,

    // Custom
    Custom(Box<dyn Fn(&[Fields]) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryCount(n) => write!(f, "EntryCount({})", n),
            Self::Shape(shape) => write!(f, "Shape({:?})", shape),
            Self::FieldEquals { index, key, value } => {
                write!(f, "FieldEquals {{ index: {}, key: {:?}, value: {} }}", index, key, value)
            }
            Self::FieldAbsent { index, key } => {
                write!(f, "FieldAbsent {{ index: {}, key: {:?} }}", index, key)
            }
            Self::NoEntryWithValue(s) => write!(f, "NoEntryWithValue({:?})", s),
            Self::TimestampsStrictlyIncreasing => write!(f, "TimestampsStrictlyIncreasing"),
            Self::TimestampsFrom { start } => write!(f, "TimestampsFrom {{ start: {} }}", start),
            Self::WellFormed => write!(f, "WellFormed"),
            Self::UnclosedContexts(n) => write!(f, "UnclosedContexts({})", n),
            Self::ThreadCount(n) => write!(f, "ThreadCount({})", n),
            Self::AllOnCallingThread => write!(f, "AllOnCallingThread"),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// Compact one-line description of an entry for shape assertions
pub fn describe(entry: &Fields) -> String {
    let text = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or_default();
    match text("control") {
        "BEGIN" => format!("BEGIN:{}", text("_title")),
        "END" => "END".to_string(),
        _ => format!("{}:{}", text("_level"), text("_value")),
    }
}
