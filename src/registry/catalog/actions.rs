//! Per-domain action enums
//!
//! Variant docs name the cache areas each action is expected to touch. The
//! authoritative pattern sets live in the dispatch tables.

action_domain! {
    /// Fishing mini-game actions
    pub enum FishingAction in "fishing" {
        /// Landed a fish: info, rank, inventory, challenges, user
        Catch => "catch",
        /// Sold one stack: inventory, info, user
        Sell => "sell",
        /// Sold everything sellable: inventory, info, user
        SellAll => "sell_all",
        /// Trading-post exchange: inventory, trading post, collection, user
        Trade => "trade",
        /// Autofish batch settled: info, inventory, rank, challenges, user
        Autofish => "autofish",
        /// Challenge reward claimed: challenges, info, user
        ClaimChallenge => "claim_challenge",
        /// Area purchased: areas, info, user
        UnlockArea => "unlock_area",
        /// Area switched: areas, info
        SelectArea => "select_area",
        /// Rod purchased or upgraded: rods, info, user
        UpgradeRod => "upgrade_rod",
        /// Rod equipped: rods, info
        EquipRod => "equip_rod",
        /// Fishing prestige: info, prestige, rods, areas, user
        Prestige => "prestige",
    }
}

action_domain! {
    /// Dojo idle-training actions
    pub enum DojoAction in "dojo" {
        /// Accumulated rewards claimed: status, user
        Claim => "claim",
        /// Character placed in a slot: status, available characters
        Assign => "assign",
        /// Character removed from a slot: status, available characters
        Unassign => "unassign",
        /// Facility upgrade: status, user
        Upgrade => "upgrade",
        /// Instant training session: status, collection, user
        Train => "train",
        /// Training slot purchased: status, user
        UnlockSlot => "unlock_slot",
    }
}

action_domain! {
    /// Gacha summoning and collection actions
    pub enum GachaAction in "gacha" {
        /// Single standard roll: pity, collection, user
        Roll => "roll",
        /// Ten-pull standard roll: pity, collection, user
        MultiRoll => "multi_roll",
        /// Single banner roll: banners, pity, collection, user, tickets
        BannerRoll => "banner_roll",
        /// Ten-pull banner roll: banners, pity, collection, user, tickets
        BannerMultiRoll => "banner_multi_roll",
        /// Character level up: collection, user
        LevelUp => "level_up",
        /// Bulk level up: collection, user
        LevelUpAll => "level_up_all",
        /// Favorite toggled: collection
        Favorite => "favorite",
        /// Duplicates sold: collection, user
        SellDuplicates => "sell_duplicates",
        /// Pity reward claimed: pity, collection, user
        ClaimPity => "claim_pity",
        /// Roll tickets purchased: tickets, user
        PurchaseTickets => "purchase_tickets",
    }
}

action_domain! {
    /// Admin panel actions tracked in the general admin table
    pub enum AdminAction in "admin" {
        /// Character created: characters, dashboard
        AddCharacter => "add_character",
        /// Character edited: characters, collection, dashboard
        EditCharacter => "edit_character",
        /// Character deleted: characters, collection, dashboard
        DeleteCharacter => "delete_character",
        /// Bulk character upload: characters, dashboard
        BulkUpload => "bulk_upload",
        /// Banner created: banners, dashboard
        AddBanner => "add_banner",
        /// Banner edited: banners, dashboard
        EditBanner => "edit_banner",
        /// Banner deleted: banners, dashboard
        DeleteBanner => "delete_banner",
        /// Banner display order changed: banners
        ReorderBanners => "reorder_banners",
        /// Banner featured flag toggled: banners
        ToggleBannerFeatured => "toggle_banner_featured",
        /// Coupon created: coupons, dashboard
        AddCoupon => "add_coupon",
        /// Coupon edited: coupons
        EditCoupon => "edit_coupon",
        /// Coupon deleted: coupons, dashboard
        DeleteCoupon => "delete_coupon",
        /// Coins granted to a user: users, dashboard
        AddCoins => "add_coins",
        /// Fish or items granted to a user: users, dashboard
        AddItems => "add_items",
        /// Autofish permission toggled: users
        ToggleAutofish => "toggle_autofish",
        /// R18 permission toggled for a user: users
        ToggleUserR18 => "toggle_user_r18",
        /// User progress reset: users, dashboard
        ResetUser => "reset_user",
        /// Rarity created: rarities, characters, dashboard
        AddRarity => "add_rarity",
        /// Rarity edited: rarities, characters
        EditRarity => "edit_rarity",
        /// Rarity deleted: rarities, characters, dashboard
        DeleteRarity => "delete_rarity",
    }
}

action_domain! {
    /// Security-related admin actions, tracked separately from the general table
    pub enum SecurityAction in "admin" {
        /// Restriction applied: users, security audit, restricted list
        RestrictUser => "restrict_user",
        /// Restriction lifted: users, security audit, restricted list
        UnrestrictUser => "unrestrict_user",
        /// Warning issued: users, security audit
        WarnUser => "warn_user",
        /// Warning counter cleared: users, security audit
        ResetWarnings => "reset_warnings",
        /// Device ban lifted: devices, security audit
        UnbanDevice => "unban_device",
        /// Security configuration saved: security config, security audit
        UpdateSecurityConfig => "update_security_config",
    }
}

action_domain! {
    /// Session and account actions
    pub enum AuthAction in "auth" {
        /// Session started: everything
        Login => "login",
        /// Session ended: everything
        Logout => "logout",
        /// Content preference toggled: user, characters, banners, collection
        ToggleR18 => "toggle_r18",
        /// Profile refresh: user
        Refresh => "refresh",
    }
}

action_domain! {
    /// Coupon redemption
    pub enum CouponAction in "coupon" {
        /// Coupon redeemed: coupons, user, collection, tickets, fishing inventory
        Redeem => "redeem",
    }
}

action_domain! {
    /// Prefetch refreshes fired when a modal opens
    pub enum ModalAction in "modal" {
        /// Gacha modal: pity, banners
        GachaOpen => "gacha_open",
        /// Character detail modal: collection
        CharacterOpen => "character_open",
        /// Fishing trade modal: trading post, fishing inventory
        TradeOpen => "trade_open",
        /// Dojo modal: status, available characters
        DojoOpen => "dojo_open",
        /// Profile modal: user
        ProfileOpen => "profile_open",
    }
}

action_domain! {
    /// Balance refreshes fired before a transaction is submitted
    pub enum PreAction in "pre" {
        /// Before any roll: user, pity, tickets
        Roll => "roll",
        /// Before a shop purchase: user
        Purchase => "purchase",
        /// Before a trading-post exchange: fishing inventory, user
        Trade => "trade",
        /// Before a dojo upgrade: user, dojo status
        Upgrade => "upgrade",
        /// Before a character enhancement: user, collection
        Enhance => "enhance",
    }
}

action_domain! {
    /// Character enhancement actions
    pub enum EnhancementAction in "enhancement" {
        /// Level up through the enhancement screen: collection, enhancements, user
        LevelUp => "level_up",
        /// Ascension: collection, enhancements, user
        Ascend => "ascend",
        /// Skill upgraded: collection, enhancements, user
        SkillUpgrade => "skill_upgrade",
        /// Awakening: collection, enhancements, user
        Awaken => "awaken",
        /// Specialization chosen: collection, enhancements, dojo status
        Specialize => "specialize",
    }
}

action_domain! {
    /// Fortune wheel actions
    pub enum FortuneAction in "fortune" {
        /// Wheel spun: status, user, collection, tickets, fishing inventory
        Spin => "spin",
        /// Streak reward claimed: status, user
        ClaimStreak => "claim_streak",
        /// Extra spin purchased: status, user
        PurchaseSpin => "purchase_spin",
    }
}

action_domain! {
    /// Announcement actions (user-facing and admin)
    pub enum AnnouncementAction in "announcement" {
        /// Announcement dismissed: active
        Dismiss => "dismiss",
        /// Announcement acknowledged: active, pending
        Acknowledge => "acknowledge",
        /// Admin created an announcement: announcements, admin list, active
        AdminCreate => "admin_create",
        /// Admin edited an announcement: announcements, admin list, active
        AdminUpdate => "admin_update",
        /// Admin deleted an announcement: announcements, admin list, active
        AdminDelete => "admin_delete",
    }
}

action_domain! {
    /// Essence tap clicker actions
    pub enum EssenceTapAction in "essence_tap" {
        /// Tap batch synced: status
        Tap => "tap",
        /// Periodic state sync: status
        Sync => "sync",
        /// Generator purchased: status, generators
        PurchaseGenerator => "purchase_generator",
        /// Upgrade purchased: status, upgrades
        PurchaseUpgrade => "purchase_upgrade",
        /// Prestige: status, generators, upgrades, prestige, user
        Prestige => "prestige",
        /// Prestige upgrade purchased: prestige, status
        PrestigeUpgrade => "prestige_upgrade",
        /// Milestone reward claimed: milestones, status, user
        ClaimMilestone => "claim_milestone",
        /// Daily challenge claimed: challenges, status, user
        ClaimDailyChallenge => "claim_daily_challenge",
        /// Offline earnings collected: status
        ClaimOffline => "claim_offline",
        /// Character assigned as an essence booster: status, characters
        AssignCharacter => "assign_character",
        /// Character booster removed: status, characters
        UnassignCharacter => "unassign_character",
        /// Essence gamble: status, user
        Gamble => "gamble",
        /// Essence infusion into a character: status, collection
        Infusion => "infusion",
        /// Boss attacked: boss, status
        BossAttack => "boss_attack",
        /// Weekly tournament rewards claimed: tournament, status, user, tickets
        ClaimTournamentRewards => "claim_tournament_rewards",
    }
}
