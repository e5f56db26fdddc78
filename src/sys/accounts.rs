//! Account and group readers for `/etc/passwd` and `/etc/group`.

use crate::error::{Context, Result};
use std::fs;
use std::path::Path;

/// One passwd record. `gid` is the account's primary group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
}

/// One group record with its secondary members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub gid: u32,
    pub userlist: Vec<String>,
}

impl Group {
    pub fn has_member(&self, account: &str) -> bool {
        self.userlist.iter().any(|m| m == account)
    }
}

pub fn read_accounts<P: AsRef<Path>>(path: P) -> Result<Vec<Account>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
    Ok(parse_passwd(&contents))
}

pub fn read_groups<P: AsRef<Path>>(path: P) -> Result<Vec<Group>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
    Ok(parse_group(&contents))
}

/// Parse passwd text. Short or malformed lines are skipped.
pub fn parse_passwd(contents: &str) -> Vec<Account> {
    let mut accounts = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() < 7 {
            continue;
        }
        let (Ok(uid), Ok(gid)) = (parts[2].parse::<u32>(), parts[3].parse::<u32>()) else { continue };
        accounts.push(Account { name: parts[0].to_string(), uid, gid });
    }
    accounts
}

pub fn parse_group(contents: &str) -> Vec<Group> {
    let mut groups = Vec::new();
    for line in contents.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() < 3 {
            continue;
        }
        let Ok(gid) = parts[2].parse::<u32>() else { continue };
        let userlist = if parts.len() >= 4 && !parts[3].is_empty() {
            parts[3].split(',').filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
        } else { Vec::new() };
        groups.push(Group { name: parts[0].to_string(), gid, userlist });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::PathBuf, time::{SystemTime, UNIX_EPOCH}};

    fn tmp_path(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("fileops_rs_{tag}_{}_{}", std::process::id(), n));
        p
    }

    #[test]
    fn parse_passwd_basic() {
        let data = "\
root:x:0:0:root:/root:/bin/bash
# comment
jdoe:x:1000:1001:John Doe,,,:/home/jdoe:/bin/zsh
broken:x:abc:0:::/bin/sh
short:x:5
";
        let accounts = parse_passwd(data);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0], Account { name: "root".into(), uid: 0, gid: 0 });
        assert_eq!(accounts[1], Account { name: "jdoe".into(), uid: 1000, gid: 1001 });
    }

    #[test]
    fn parse_group_members() {
        let data = "\
root:x:0:
wheel:x:998:root,jdoe
nomembers:x:1002
";
        let groups = parse_group(data);
        assert_eq!(groups.len(), 3);
        assert!(groups[0].userlist.is_empty());
        assert_eq!(groups[1].userlist, vec!["root".to_string(), "jdoe".to_string()]);
        assert!(groups[1].has_member("jdoe"));
        assert!(!groups[1].has_member("jdo"));
        assert!(groups[2].userlist.is_empty());
    }

    #[test]
    fn read_from_files() {
        let pw = tmp_path("passwd");
        let gr = tmp_path("group");
        fs::write(&pw, "alice:x:1000:1000::/home/alice:/bin/sh\n").unwrap();
        fs::write(&gr, "alice:x:1000:\n").unwrap();
        let accounts = read_accounts(&pw).unwrap();
        let groups = read_groups(&gr).unwrap();
        fs::remove_file(&pw).ok();
        fs::remove_file(&gr).ok();
        assert_eq!(accounts[0].name, "alice");
        assert_eq!(groups[0].gid, 1000);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = read_accounts("/nonexistent/fileops/passwd").unwrap_err();
        assert!(err.to_string().starts_with("read /nonexistent/fileops/passwd"));
    }
}
