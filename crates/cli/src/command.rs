//! Command-name parsing for the interactive loop.

/// One of the recognized command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Balance,
    Sale,
    Purchase,
    Account,
    List,
    Warehouse,
    Review,
    End,
}

impl Command {
    /// Menu order, as shown to the user after every command.
    pub const MENU: &'static [&'static str] = &[
        "Balance",
        "Sale",
        "Purchase",
        "Account",
        "List",
        "Warehouse",
        "Review",
        "End",
    ];

    /// Parse a normalized (trimmed, lowercased) command name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "balance" => Some(Self::Balance),
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            "account" => Some(Self::Account),
            "list" => Some(Self::List),
            "warehouse" => Some(Self::Warehouse),
            "review" => Some(Self::Review),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}
