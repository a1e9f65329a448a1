//! Application routes and sidebar navigation.

use std::fmt;

/// A view the application can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    WaterUsageOverview,
    WaterInput,
    UsageQuota,
    Alerts,
    OptimizationTips,
    Leaderboard,
    LocationComparison,
    WaterRecycling,
    SmartGardenScheduler,
    CommunityWall,
    ProductSuggestions,
    Login,
    Questionnaire,
}

impl Route {
    /// Sidebar entries in display order.
    pub const SIDEBAR: [Route; 12] = [
        Route::Dashboard,
        Route::WaterUsageOverview,
        Route::WaterInput,
        Route::UsageQuota,
        Route::Alerts,
        Route::OptimizationTips,
        Route::Leaderboard,
        Route::LocationComparison,
        Route::WaterRecycling,
        Route::SmartGardenScheduler,
        Route::CommunityWall,
        Route::ProductSuggestions,
    ];

    /// URL path of the view.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/Dashboard1",
            Route::WaterUsageOverview => "/Waterusageoverview",
            Route::WaterInput => "/Waterinput",
            Route::UsageQuota => "/Usagequota",
            Route::Alerts => "/Alerts",
            Route::OptimizationTips => "/Optimizationtips",
            Route::Leaderboard => "/Leaderboard",
            Route::LocationComparison => "/LocationComparison",
            Route::WaterRecycling => "/Watercycling",
            Route::SmartGardenScheduler => "/SmartgardernScheduler",
            Route::CommunityWall => "/CommunityWall",
            Route::ProductSuggestions => "/productsuggestions",
            Route::Login => "/login",
            Route::Questionnaire => "/questionnaire",
        }
    }

    /// Human-readable title of the view.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::WaterUsageOverview => "Water Usage Overview",
            Route::WaterInput => "Water Input",
            Route::UsageQuota => "Usage Quota",
            Route::Alerts => "Alerts",
            Route::OptimizationTips => "Optimization Tips",
            Route::Leaderboard => "Leaderboard",
            Route::LocationComparison => "Location Comparison",
            Route::WaterRecycling => "Water Recycling Tracker",
            Route::SmartGardenScheduler => "Smart Garden Scheduler",
            Route::CommunityWall => "Community Wall",
            Route::ProductSuggestions => "Product Suggestions",
            Route::Login => "Login",
            Route::Questionnaire => "Water Usage Questionnaire",
        }
    }

    /// Looks up a route by path, ignoring ASCII case and a trailing `/`.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = normalize(path);
        Route::SIDEBAR
            .into_iter()
            .chain([Route::Login, Route::Questionnaire])
            .find(|route| route.path().eq_ignore_ascii_case(path))
    }

    /// Returns `true` if the sidebar should highlight this route while
    /// `current` is shown.
    ///
    /// The dashboard only matches exactly; other routes also match their
    /// sub-paths.
    pub fn is_active(&self, current: &str) -> bool {
        let current = normalize(current).to_ascii_lowercase();
        let own = self.path().to_ascii_lowercase();

        if current == own {
            return true;
        }

        *self != Route::Dashboard
            && current
                .strip_prefix(own.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/')
    } else {
        trimmed
    }
}
