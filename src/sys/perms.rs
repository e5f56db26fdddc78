//! Permission option table shared by the owner/group/other access selects.

/// One octal permission digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    None = 0,
    ExecuteOnly = 1,
    WriteOnly = 2,
    WriteExecute = 3,
    ReadOnly = 4,
    ReadExecute = 5,
    ReadWrite = 6,
    ReadWriteExecute = 7,
}

/// All options in the order the selects show them.
pub const PERMISSION_OPTIONS: [AccessLevel; 8] = [
    AccessLevel::None,
    AccessLevel::ExecuteOnly,
    AccessLevel::WriteOnly,
    AccessLevel::WriteExecute,
    AccessLevel::ReadOnly,
    AccessLevel::ReadExecute,
    AccessLevel::ReadWrite,
    AccessLevel::ReadWriteExecute,
];

impl AccessLevel {
    pub fn from_digit(d: u32) -> Self {
        PERMISSION_OPTIONS[(d & 0o7) as usize]
    }

    pub fn digit(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessLevel::None => "No access",
            AccessLevel::ExecuteOnly => "Execute-only",
            AccessLevel::WriteOnly => "Write-only",
            AccessLevel::WriteExecute => "Write and execute",
            AccessLevel::ReadOnly => "Read-only",
            AccessLevel::ReadExecute => "Read and execute",
            AccessLevel::ReadWrite => "Read and write",
            AccessLevel::ReadWriteExecute => "Read, write and execute",
        }
    }

    /// Next option in table order, wrapping.
    pub fn next(self) -> Self {
        Self::from_digit(self.digit() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_digit(self.digit() + 7)
    }
}

/// Owner, group and other access levels.
pub type Permissions = [AccessLevel; 3];

pub fn permissions_from_mode(mode: u32) -> Permissions {
    [
        AccessLevel::from_digit(mode >> 6),
        AccessLevel::from_digit(mode >> 3),
        AccessLevel::from_digit(mode),
    ]
}

/// Three-digit octal string as `chmod` takes it, e.g. `"750"`.
pub fn mode_string(p: &Permissions) -> String {
    format!("{}{}{}", p[0].digit(), p[1].digit(), p[2].digit())
}

/// `rwxr-x---` style rendering for the listing.
pub fn symbolic(p: &Permissions) -> String {
    let mut s = String::with_capacity(9);
    for level in p {
        let d = level.digit();
        s.push(if d & 4 != 0 { 'r' } else { '-' });
        s.push(if d & 2 != 0 { 'w' } else { '-' });
        s.push(if d & 1 != 0 { 'x' } else { '-' });
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_split_and_join() {
        let p = permissions_from_mode(0o100750);
        assert_eq!(p, [AccessLevel::ReadWriteExecute, AccessLevel::ReadExecute, AccessLevel::None]);
        assert_eq!(mode_string(&p), "750");
        assert_eq!(symbolic(&p), "rwxr-x---");
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(AccessLevel::ReadWriteExecute.next(), AccessLevel::None);
        assert_eq!(AccessLevel::None.prev(), AccessLevel::ReadWriteExecute);
        assert_eq!(AccessLevel::ReadOnly.next(), AccessLevel::ReadExecute);
    }
}
