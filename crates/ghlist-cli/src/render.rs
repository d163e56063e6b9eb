//! Plain-text rendering of users, profiles and sync results.

use std::fmt::Write;

use ghlist_core::{SyncReport, SyncSource, User, UserCollection, UserProfile};

use crate::utils::{format_count, or_placeholder, truncate_string};

const LOGIN_WIDTH: usize = 20;
const NAME_WIDTH: usize = 24;

/// One row per user. Users whose profile failed still get a row, with
/// placeholders in the profile columns.
pub fn users_table(collection: &UserCollection, has_avatar: impl Fn(i64) -> bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8}  {:<LOGIN_WIDTH$}  {:<NAME_WIDTH$}  {:>9}  {:>6}  {}",
        "ID", "LOGIN", "NAME", "FOLLOWERS", "REPOS", "AVATAR"
    );

    for user in &collection.users {
        let profile = collection.profile(&user.login);
        let name = profile.map(|p| or_placeholder(&p.name, "-")).unwrap_or("?");
        let followers = profile.map(|p| format_count(p.followers)).unwrap_or_else(|| "?".to_string());
        let repos = profile.map(|p| format_count(p.public_repos)).unwrap_or_else(|| "?".to_string());
        let avatar = if has_avatar(user.id) { "yes" } else { "no" };

        let _ = writeln!(
            out,
            "{:>8}  {:<LOGIN_WIDTH$}  {:<NAME_WIDTH$}  {:>9}  {:>6}  {}",
            user.id,
            truncate_string(&user.login, LOGIN_WIDTH),
            truncate_string(name, NAME_WIDTH),
            followers,
            repos,
            avatar
        );
    }
    out
}

pub fn profile_detail(profile: &UserProfile, user: Option<&User>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", profile.display_name(), profile.login);
    if let Some(user) = user {
        let _ = writeln!(out, "  {}", user.profile_url);
    }
    let _ = writeln!(out, "  Location:  {}", or_placeholder(&profile.location, "-"));
    let _ = writeln!(out, "  Bio:       {}", or_placeholder(&profile.bio, "-"));
    let _ = writeln!(
        out,
        "  Repos:     {}   Gists: {}",
        profile.public_repos, profile.public_gists
    );
    let _ = writeln!(
        out,
        "  Followers: {}   Following: {}",
        profile.followers, profile.following
    );
    out
}

pub fn report_line(report: &SyncReport) -> String {
    match report.source {
        SyncSource::Unavailable => "GitHub is unreachable right now; nothing to show".to_string(),
        SyncSource::Cache if report.users == 0 => {
            "No offline data yet - run `ghlist sync` while online".to_string()
        }
        source => {
            let mut line = format!(
                "{} users, {} profiles (from {})",
                report.users, report.profiles, source
            );
            if !report.failed_profiles.is_empty() {
                let _ = write!(line, "; {} profiles failed", report.failed_profiles.len());
            }
            if !report.failed_avatars.is_empty() {
                let _ = write!(line, "; {} avatars failed", report.failed_avatars.len());
            }
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str, id: i64) -> User {
        User {
            login: login.to_string(),
            id,
            avatar_url: String::new(),
            profile_url: format!("https://github.com/{}", login),
        }
    }

    #[test]
    fn test_users_table_marks_missing_profiles() {
        let collection = UserCollection::new(
            vec![user("mojombo", 1), user("defunkt", 2)],
            vec![UserProfile {
                login: "mojombo".to_string(),
                name: "Tom Preston-Werner".to_string(),
                followers: 23933,
                ..Default::default()
            }],
        );
        let table = users_table(&collection, |id| id == 1);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Tom Preston-Werner"));
        assert!(lines[1].contains("23.9k"));
        assert!(lines[1].ends_with("yes"));
        assert!(lines[2].contains("defunkt"));
        assert!(lines[2].contains('?'));
        assert!(lines[2].ends_with("no"));
    }

    #[test]
    fn test_profile_detail_placeholders() {
        let profile = UserProfile {
            login: "ghost".to_string(),
            ..Default::default()
        };
        let text = profile_detail(&profile, None);
        assert!(text.starts_with("ghost (ghost)"));
        assert!(text.contains("Bio:       -"));
    }

    #[test]
    fn test_report_line() {
        assert!(report_line(&SyncReport::unavailable()).contains("unreachable"));
        assert!(report_line(&SyncReport::cached(0, 0)).contains("No offline data"));
        assert_eq!(report_line(&SyncReport::cached(30, 29)), "30 users, 29 profiles (from cache)");

        let partial = SyncReport {
            source: SyncSource::Remote,
            users: 30,
            profiles: 28,
            failed_avatars: vec![7],
            failed_profiles: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            report_line(&partial),
            "30 users, 28 profiles (from remote); 2 profiles failed; 1 avatars failed"
        );
    }
}
