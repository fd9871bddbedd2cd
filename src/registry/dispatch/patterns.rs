//! Action to cache-pattern lookup tables
//!
//! One table per domain. Every table is an exhaustive `match`, so adding a
//! catalog variant without a dispatch entry fails to compile.

use crate::registry::catalog::{
    Action, AdminAction, AnnouncementAction, AuthAction, CouponAction, DojoAction,
    EnhancementAction, EssenceTapAction, FishingAction, FortuneAction, GachaAction, ModalAction,
    PreAction, SecurityAction,
};

/// Pattern reported for actions that clear the whole cache. Informational only.
pub const FULL_CLEAR_SENTINEL: &str = "*";

/// What a handler clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// One clear call per pattern, in order
    Patterns(&'static [&'static str]),
    /// A single zero-argument clear of the entire store
    Everything,
}

impl ClearScope {
    /// Patterns as reported to introspection tooling
    pub fn reported_patterns(self) -> Vec<&'static str> {
        match self {
            ClearScope::Patterns(patterns) => patterns.to_vec(),
            ClearScope::Everything => vec![FULL_CLEAR_SENTINEL],
        }
    }
}

impl Action {
    /// Handler scope for this action
    pub fn clear_scope(self) -> ClearScope {
        match self {
            Action::Fishing(a) => ClearScope::Patterns(fishing_patterns(a)),
            Action::Dojo(a) => ClearScope::Patterns(dojo_patterns(a)),
            Action::Gacha(a) => ClearScope::Patterns(gacha_patterns(a)),
            Action::Admin(a) => ClearScope::Patterns(admin_patterns(a)),
            Action::Security(a) => ClearScope::Patterns(security_patterns(a)),
            Action::Auth(a) => auth_scope(a),
            Action::Coupon(a) => ClearScope::Patterns(coupon_patterns(a)),
            Action::Modal(a) => ClearScope::Patterns(modal_patterns(a)),
            Action::Pre(a) => ClearScope::Patterns(pre_patterns(a)),
            Action::Enhancement(a) => ClearScope::Patterns(enhancement_patterns(a)),
            Action::Fortune(a) => ClearScope::Patterns(fortune_patterns(a)),
            Action::Announcement(a) => ClearScope::Patterns(announcement_patterns(a)),
            Action::EssenceTap(a) => ClearScope::Patterns(essence_tap_patterns(a)),
        }
    }
}

pub fn fishing_patterns(action: FishingAction) -> &'static [&'static str] {
    match action {
        FishingAction::Catch => &[
            "/fishing/info",
            "/fishing/rank",
            "/fishing/inventory",
            "/fishing/challenges",
            "/auth/me",
        ],
        FishingAction::Sell | FishingAction::SellAll => {
            &["/fishing/inventory", "/fishing/info", "/auth/me"]
        }
        FishingAction::Trade => &[
            "/fishing/inventory",
            "/fishing/trading-post",
            "/characters/collection",
            "/auth/me",
        ],
        FishingAction::Autofish => &[
            "/fishing/info",
            "/fishing/inventory",
            "/fishing/rank",
            "/fishing/challenges",
            "/auth/me",
        ],
        FishingAction::ClaimChallenge => &["/fishing/challenges", "/fishing/info", "/auth/me"],
        FishingAction::UnlockArea => &["/fishing/areas", "/fishing/info", "/auth/me"],
        FishingAction::SelectArea => &["/fishing/areas", "/fishing/info"],
        FishingAction::UpgradeRod => &["/fishing/rods", "/fishing/info", "/auth/me"],
        FishingAction::EquipRod => &["/fishing/rods", "/fishing/info"],
        FishingAction::Prestige => &[
            "/fishing/info",
            "/fishing/prestige",
            "/fishing/rods",
            "/fishing/areas",
            "/auth/me",
        ],
    }
}

pub fn dojo_patterns(action: DojoAction) -> &'static [&'static str] {
    match action {
        DojoAction::Claim | DojoAction::Upgrade | DojoAction::UnlockSlot => {
            &["/dojo/status", "/auth/me"]
        }
        DojoAction::Assign | DojoAction::Unassign => {
            &["/dojo/status", "/dojo/available-characters"]
        }
        DojoAction::Train => &["/dojo/status", "/characters/collection", "/auth/me"],
    }
}

pub fn gacha_patterns(action: GachaAction) -> &'static [&'static str] {
    match action {
        GachaAction::Roll | GachaAction::MultiRoll => {
            &["/gacha/pity", "/characters/collection", "/auth/me"]
        }
        GachaAction::BannerRoll | GachaAction::BannerMultiRoll => &[
            "/banners",
            "/gacha/pity",
            "/characters/collection",
            "/auth/me",
            "/banners/user/tickets",
        ],
        GachaAction::LevelUp | GachaAction::LevelUpAll | GachaAction::SellDuplicates => {
            &["/characters/collection", "/auth/me"]
        }
        GachaAction::Favorite => &["/characters/collection"],
        GachaAction::ClaimPity => &["/gacha/pity", "/characters/collection", "/auth/me"],
        GachaAction::PurchaseTickets => &["/banners/user/tickets", "/auth/me"],
    }
}

pub fn admin_patterns(action: AdminAction) -> &'static [&'static str] {
    match action {
        AdminAction::AddCharacter | AdminAction::BulkUpload => {
            &["/characters", "/admin/dashboard"]
        }
        AdminAction::EditCharacter | AdminAction::DeleteCharacter => {
            &["/characters", "/characters/collection", "/admin/dashboard"]
        }
        AdminAction::AddBanner | AdminAction::EditBanner | AdminAction::DeleteBanner => {
            &["/banners", "/admin/dashboard"]
        }
        AdminAction::ReorderBanners | AdminAction::ToggleBannerFeatured => &["/banners"],
        AdminAction::AddCoupon | AdminAction::DeleteCoupon => {
            &["/admin/coupons", "/admin/dashboard"]
        }
        AdminAction::EditCoupon => &["/admin/coupons"],
        AdminAction::AddCoins | AdminAction::AddItems | AdminAction::ResetUser => {
            &["/admin/users", "/admin/dashboard"]
        }
        AdminAction::ToggleAutofish | AdminAction::ToggleUserR18 => &["/admin/users"],
        AdminAction::AddRarity | AdminAction::DeleteRarity => {
            &["/rarities", "/characters", "/admin/dashboard"]
        }
        AdminAction::EditRarity => &["/rarities", "/characters"],
    }
}

pub fn security_patterns(action: SecurityAction) -> &'static [&'static str] {
    match action {
        SecurityAction::RestrictUser | SecurityAction::UnrestrictUser => &[
            "/admin/users",
            "/admin/security/audit",
            "/admin/security/restricted",
        ],
        SecurityAction::WarnUser | SecurityAction::ResetWarnings => {
            &["/admin/users", "/admin/security/audit"]
        }
        SecurityAction::UnbanDevice => &["/admin/security/devices", "/admin/security/audit"],
        SecurityAction::UpdateSecurityConfig => {
            &["/admin/security/config", "/admin/security/audit"]
        }
    }
}

pub fn auth_scope(action: AuthAction) -> ClearScope {
    match action {
        AuthAction::Login | AuthAction::Logout => ClearScope::Everything,
        AuthAction::ToggleR18 => ClearScope::Patterns(&[
            "/auth/me",
            "/characters",
            "/banners",
            "/characters/collection",
        ]),
        AuthAction::Refresh => ClearScope::Patterns(&["/auth/me"]),
    }
}

pub fn coupon_patterns(action: CouponAction) -> &'static [&'static str] {
    match action {
        CouponAction::Redeem => &[
            "/coupons",
            "/auth/me",
            "/characters/collection",
            "/banners/user/tickets",
            "/fishing/inventory",
        ],
    }
}

pub fn modal_patterns(action: ModalAction) -> &'static [&'static str] {
    match action {
        ModalAction::GachaOpen => &["/gacha/pity", "/banners"],
        ModalAction::CharacterOpen => &["/characters/collection"],
        ModalAction::TradeOpen => &["/fishing/trading-post", "/fishing/inventory"],
        ModalAction::DojoOpen => &["/dojo/status", "/dojo/available-characters"],
        ModalAction::ProfileOpen => &["/auth/me"],
    }
}

pub fn pre_patterns(action: PreAction) -> &'static [&'static str] {
    match action {
        PreAction::Roll => &["/auth/me", "/gacha/pity", "/banners/user/tickets"],
        PreAction::Purchase => &["/auth/me"],
        PreAction::Trade => &["/fishing/inventory", "/auth/me"],
        PreAction::Upgrade => &["/auth/me", "/dojo/status"],
        PreAction::Enhance => &["/auth/me", "/characters/collection"],
    }
}

pub fn enhancement_patterns(action: EnhancementAction) -> &'static [&'static str] {
    match action {
        EnhancementAction::LevelUp
        | EnhancementAction::Ascend
        | EnhancementAction::SkillUpgrade
        | EnhancementAction::Awaken => &["/characters/collection", "/enhancements", "/auth/me"],
        EnhancementAction::Specialize => {
            &["/characters/collection", "/enhancements", "/dojo/status"]
        }
    }
}

pub fn fortune_patterns(action: FortuneAction) -> &'static [&'static str] {
    match action {
        FortuneAction::Spin => &[
            "/fortune-wheel/status",
            "/auth/me",
            "/characters/collection",
            "/banners/user/tickets",
            "/fishing/inventory",
        ],
        FortuneAction::ClaimStreak | FortuneAction::PurchaseSpin => {
            &["/fortune-wheel/status", "/auth/me"]
        }
    }
}

pub fn announcement_patterns(action: AnnouncementAction) -> &'static [&'static str] {
    match action {
        AnnouncementAction::Dismiss => &["/announcements/active"],
        AnnouncementAction::Acknowledge => &["/announcements/active", "/announcements/pending"],
        AnnouncementAction::AdminCreate
        | AnnouncementAction::AdminUpdate
        | AnnouncementAction::AdminDelete => &[
            "/announcements",
            "/admin/announcements",
            "/announcements/active",
        ],
    }
}

pub fn essence_tap_patterns(action: EssenceTapAction) -> &'static [&'static str] {
    match action {
        EssenceTapAction::Tap | EssenceTapAction::Sync | EssenceTapAction::ClaimOffline => {
            &["/essence-tap/status"]
        }
        EssenceTapAction::PurchaseGenerator => {
            &["/essence-tap/status", "/essence-tap/generators"]
        }
        EssenceTapAction::PurchaseUpgrade => &["/essence-tap/status", "/essence-tap/upgrades"],
        EssenceTapAction::Prestige => &[
            "/essence-tap/status",
            "/essence-tap/generators",
            "/essence-tap/upgrades",
            "/essence-tap/prestige",
            "/auth/me",
        ],
        EssenceTapAction::PrestigeUpgrade => &["/essence-tap/prestige", "/essence-tap/status"],
        EssenceTapAction::ClaimMilestone => {
            &["/essence-tap/milestones", "/essence-tap/status", "/auth/me"]
        }
        EssenceTapAction::ClaimDailyChallenge => {
            &["/essence-tap/challenges", "/essence-tap/status", "/auth/me"]
        }
        EssenceTapAction::AssignCharacter | EssenceTapAction::UnassignCharacter => {
            &["/essence-tap/status", "/essence-tap/characters"]
        }
        EssenceTapAction::Gamble => &["/essence-tap/status", "/auth/me"],
        EssenceTapAction::Infusion => &["/essence-tap/status", "/characters/collection"],
        EssenceTapAction::BossAttack => &["/essence-tap/boss", "/essence-tap/status"],
        EssenceTapAction::ClaimTournamentRewards => &[
            "/essence-tap/tournament",
            "/essence-tap/status",
            "/auth/me",
            "/banners/user/tickets",
        ],
    }
}

/// Pattern lookup by raw identifier, as used by introspection tooling.
///
/// Returns `None` when the domain prefix or the name is unrecognized. Admin
/// names are looked up in the security table before the general admin table.
/// Auth actions with a full-clear handler report [`FULL_CLEAR_SENTINEL`].
pub fn lookup_patterns(action: &str) -> Option<Vec<&'static str>> {
    action
        .parse::<Action>()
        .ok()
        .map(|action| action.clear_scope().reported_patterns())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fishing_catch_patterns_in_order() {
        assert_eq!(
            lookup_patterns("fishing:catch"),
            Some(vec![
                "/fishing/info",
                "/fishing/rank",
                "/fishing/inventory",
                "/fishing/challenges",
                "/auth/me",
            ])
        );
    }

    #[test]
    fn test_security_table_fallback() {
        assert_eq!(
            lookup_patterns("admin:restrict_user"),
            Some(security_patterns(SecurityAction::RestrictUser).to_vec())
        );
        assert_eq!(
            lookup_patterns("admin:add_banner"),
            Some(vec!["/banners", "/admin/dashboard"])
        );
    }

    #[test]
    fn test_auth_reporting() {
        assert_eq!(lookup_patterns("auth:login"), Some(vec!["*"]));
        assert_eq!(lookup_patterns("auth:logout"), Some(vec!["*"]));
        assert_eq!(lookup_patterns("auth:refresh"), Some(vec!["/auth/me"]));
        assert_eq!(lookup_patterns("auth:toggle_r18").map(|p| p.len()), Some(4));
    }

    #[test]
    fn test_lookup_misses_return_none() {
        assert_eq!(lookup_patterns("not:real"), None);
        assert_eq!(lookup_patterns("fishing:teleport"), None);
        assert_eq!(lookup_patterns("auth:impersonate"), None);
        assert_eq!(lookup_patterns("no-colon"), None);
    }

    #[test]
    fn test_every_pattern_set_is_non_empty() {
        for action in Action::all() {
            if let ClearScope::Patterns(patterns) = action.clear_scope() {
                assert!(!patterns.is_empty(), "{} has no patterns", action);
                assert!(
                    patterns.iter().all(|p| p.starts_with('/')),
                    "{} has a non-path pattern",
                    action
                );
            }
        }
    }
}
