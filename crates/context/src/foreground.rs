//! Foreground application classification.
//!
//! Turns window-change notifications into mode hints. System surfaces
//! (status bar, launchers, settings, ourselves) are ignored entirely so that
//! pulling down a notification shade does not flip the active profile.

use crate::mode::Mode;
use crate::shape::AspectBucket;

/// Packages that must never trigger a mode switch.
pub const DENYLISTED_APPS: &[&str] = &[
    "com.android.systemui",
    "com.lge.launcher3",
    "com.android.launcher",
    "com.huawei.android.launcher",
    "com.xiaomi.launcher",
    "com.oppo.launcher",
    "com.vivo.launcher",
    "com.samsung.android.launcher",
    "com.lge.displayfingerprint",
    "com.example.bluetoothkeymapper",
    "android",
    "com.android.settings",
];

/// Package prefixes of the YouTube family.
pub const YOUTUBE_APPS: &[&str] = &[
    "com.google.android.youtube",
    "com.google.android.apps.youtube.music",
];

/// Package prefixes of the TikTok family (TikTok, Douyin, Toutiao).
pub const TIKTOK_APPS: &[&str] = &[
    "com.zhiliaoapp.musically",
    "com.ss.android.ugc.aweme",
    "com.ss.android.article.news",
];

/// Package prefixes of Baidu Netdisk.
pub const BAIDU_APPS: &[&str] = &["com.baidu.netdisk"];

/// Package prefixes of Bilibili.
pub const BILIBILI_APPS: &[&str] = &["tv.danmaku.bili"];

/// Known application families with their own profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppFamily {
    YouTube,
    TikTok,
    Baidu,
    Bilibili,
}

impl AppFamily {
    /// Find the family a package belongs to, matching by prefix.
    pub fn of(app_id: &str) -> Option<Self> {
        let matches = |prefixes: &[&str]| prefixes.iter().any(|p| app_id.starts_with(p));

        if matches(YOUTUBE_APPS) {
            Some(AppFamily::YouTube)
        } else if matches(TIKTOK_APPS) {
            Some(AppFamily::TikTok)
        } else if matches(BAIDU_APPS) {
            Some(AppFamily::Baidu)
        } else if matches(BILIBILI_APPS) {
            Some(AppFamily::Bilibili)
        } else {
            None
        }
    }

    /// Mode bound to this family on a display of the given shape.
    pub fn mode_for(&self, aspect: AspectBucket) -> Mode {
        match self {
            // YouTube lays out its player differently on 16:9 screens.
            AppFamily::YouTube if aspect == AspectBucket::Bucket16x9 => Mode::Tv,
            AppFamily::YouTube => Mode::YouTube,
            AppFamily::TikTok => Mode::TikTok,
            AppFamily::Baidu => Mode::Baidu,
            AppFamily::Bilibili => Mode::Bilibili,
        }
    }
}

/// Result of a foreground-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppHint {
    /// Denylisted, empty, or unchanged. Nothing should happen.
    Ignored,
    /// A mapped family came to the foreground.
    Mode(Mode),
    /// An unmapped app came to the foreground; fall through to the
    /// aspect-ratio fallback.
    NoHint,
}

/// Tracks the current foreground app and classifies changes.
#[derive(Debug, Clone)]
pub struct ForegroundAppClassifier {
    denylist: Vec<String>,
    current: Option<String>,
}

impl Default for ForegroundAppClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundAppClassifier {
    pub fn new() -> Self {
        Self {
            denylist: DENYLISTED_APPS.iter().map(|s| s.to_string()).collect(),
            current: None,
        }
    }

    /// Create a classifier with extra denylisted packages on top of the
    /// built-in list.
    pub fn with_extra_denylist<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classifier = Self::new();
        for app in extra {
            let app = app.into();
            if !classifier.denylist.contains(&app) {
                classifier.denylist.push(app);
            }
        }
        classifier
    }

    pub fn is_denylisted(&self, app_id: &str) -> bool {
        self.denylist.iter().any(|d| d == app_id)
    }

    /// The last non-denylisted foreground app, if any was seen.
    pub fn current_app(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether keys should be intercepted for the current foreground app.
    ///
    /// Before any foreground app is known, keys are intercepted.
    pub fn is_target_app(&self) -> bool {
        match &self.current {
            None => true,
            Some(app) => AppFamily::of(app).is_some(),
        }
    }

    /// Classify a foreground change against the current display bucket.
    pub fn on_foreground_changed(&mut self, app_id: &str, aspect: AspectBucket) -> AppHint {
        if app_id.is_empty() {
            return AppHint::Ignored;
        }

        if self.current.as_deref() == Some(app_id) {
            return AppHint::Ignored;
        }

        if self.is_denylisted(app_id) {
            tracing::debug!(app = app_id, "ignoring denylisted foreground app");
            return AppHint::Ignored;
        }

        self.current = Some(app_id.to_string());

        match AppFamily::of(app_id) {
            Some(family) => {
                let mode = family.mode_for(aspect);
                tracing::debug!(app = app_id, ?family, %mode, %aspect, "foreground app mapped");
                AppHint::Mode(mode)
            }
            None => {
                tracing::debug!(app = app_id, "foreground app unmapped");
                AppHint::NoHint
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_prefix_matching() {
        assert_eq!(AppFamily::of("com.google.android.youtube"), Some(AppFamily::YouTube));
        assert_eq!(
            AppFamily::of("com.google.android.apps.youtube.music"),
            Some(AppFamily::YouTube)
        );
        assert_eq!(AppFamily::of("com.zhiliaoapp.musically.go"), Some(AppFamily::TikTok));
        assert_eq!(AppFamily::of("com.ss.android.ugc.aweme.lite"), Some(AppFamily::TikTok));
        assert_eq!(AppFamily::of("com.ss.android.article.news"), Some(AppFamily::TikTok));
        assert_eq!(AppFamily::of("com.baidu.netdisk"), Some(AppFamily::Baidu));
        assert_eq!(AppFamily::of("tv.danmaku.bili"), Some(AppFamily::Bilibili));
        assert_eq!(AppFamily::of("org.mozilla.firefox"), None);
    }

    #[test]
    fn test_youtube_depends_on_aspect() {
        let mut c = ForegroundAppClassifier::new();
        assert_eq!(
            c.on_foreground_changed("com.google.android.youtube", AspectBucket::Bucket16x9),
            AppHint::Mode(Mode::Tv)
        );

        let mut c = ForegroundAppClassifier::new();
        assert_eq!(
            c.on_foreground_changed("com.google.android.youtube", AspectBucket::Bucket20x9),
            AppHint::Mode(Mode::YouTube)
        );

        let mut c = ForegroundAppClassifier::new();
        assert_eq!(
            c.on_foreground_changed("com.google.android.youtube", AspectBucket::Unclassified),
            AppHint::Mode(Mode::YouTube)
        );
    }

    #[test]
    fn test_denylisted_app_does_not_update_current() {
        let mut c = ForegroundAppClassifier::new();
        c.on_foreground_changed("tv.danmaku.bili", AspectBucket::Bucket20x9);

        let hint = c.on_foreground_changed("com.android.systemui", AspectBucket::Bucket20x9);
        assert_eq!(hint, AppHint::Ignored);
        assert_eq!(c.current_app(), Some("tv.danmaku.bili"));
    }

    #[test]
    fn test_repeated_app_is_idempotent() {
        let mut c = ForegroundAppClassifier::new();
        assert_eq!(
            c.on_foreground_changed("com.baidu.netdisk", AspectBucket::Bucket20x9),
            AppHint::Mode(Mode::Baidu)
        );
        assert_eq!(
            c.on_foreground_changed("com.baidu.netdisk", AspectBucket::Bucket20x9),
            AppHint::Ignored
        );
    }

    #[test]
    fn test_unmapped_app_gives_no_hint() {
        let mut c = ForegroundAppClassifier::new();
        assert_eq!(
            c.on_foreground_changed("org.mozilla.firefox", AspectBucket::Bucket20x9),
            AppHint::NoHint
        );
        assert_eq!(c.current_app(), Some("org.mozilla.firefox"));
    }

    #[test]
    fn test_empty_app_is_ignored() {
        let mut c = ForegroundAppClassifier::new();
        assert_eq!(c.on_foreground_changed("", AspectBucket::Bucket20x9), AppHint::Ignored);
        assert_eq!(c.current_app(), None);
    }

    #[test]
    fn test_target_app_gating() {
        let mut c = ForegroundAppClassifier::new();
        assert!(c.is_target_app(), "unknown foreground allows interception");

        c.on_foreground_changed("org.mozilla.firefox", AspectBucket::Bucket20x9);
        assert!(!c.is_target_app());

        c.on_foreground_changed("com.google.android.youtube.tv", AspectBucket::Bucket20x9);
        assert!(c.is_target_app());
    }

    #[test]
    fn test_extra_denylist() {
        let mut c = ForegroundAppClassifier::with_extra_denylist(["com.nova.launcher"]);
        assert!(c.is_denylisted("com.nova.launcher"));
        assert!(c.is_denylisted("com.android.systemui"));
        assert_eq!(
            c.on_foreground_changed("com.nova.launcher", AspectBucket::Bucket20x9),
            AppHint::Ignored
        );
    }
}
