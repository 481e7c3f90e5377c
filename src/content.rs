//! Static catalogs behind the news, mods, downloads and servers tabs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCategory {
    Update,
    Mods,
    Launcher,
    Community,
    Enhancement,
}

impl NewsCategory {
    pub fn label(self) -> &'static str {
        match self {
            NewsCategory::Update => "Update",
            NewsCategory::Mods => "Mods",
            NewsCategory::Launcher => "Launcher",
            NewsCategory::Community => "Community",
            NewsCategory::Enhancement => "Enhancement",
        }
    }
}

pub struct NewsItem {
    pub title: &'static str,
    pub summary: &'static str,
    pub date: &'static str,
    pub category: NewsCategory,
    pub featured: bool,
}

pub const NEWS : &[NewsItem] = &[
    NewsItem {
        title: "Minecraft 1.21 - The Tricky Trials Update",
        summary: "Explore new trial chambers, face challenging mobs, and discover unique rewards in the latest update.",
        date: "2024-06-25",
        category: NewsCategory::Update,
        featured: true,
    },
    NewsItem {
        title: "New Mods Available in Launcher",
        summary: "OptiFine HD, JEI, and 15 other popular mods are now available for one-click installation.",
        date: "2024-06-20",
        category: NewsCategory::Mods,
        featured: false,
    },
    NewsItem {
        title: "Performance Improvements",
        summary: "Our latest launcher update includes significant performance optimizations and bug fixes.",
        date: "2024-06-18",
        category: NewsCategory::Launcher,
        featured: false,
    },
    NewsItem {
        title: "Community Server Spotlight",
        summary: "Discover amazing community servers with custom game modes, mini-games, and unique experiences.",
        date: "2024-06-15",
        category: NewsCategory::Community,
        featured: false,
    },
    NewsItem {
        title: "Shader Pack Integration",
        summary: "Popular shader packs are now integrated directly into the launcher for easy installation and management.",
        date: "2024-06-12",
        category: NewsCategory::Enhancement,
        featured: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModCategory {
    Performance,
    Visual,
    Utility,
    Gameplay,
}

impl ModCategory {
    pub const ALL : [ModCategory; 4] = [
        ModCategory::Performance,
        ModCategory::Visual,
        ModCategory::Utility,
        ModCategory::Gameplay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModCategory::Performance => "Performance",
            ModCategory::Visual => "Visual",
            ModCategory::Utility => "Utility",
            ModCategory::Gameplay => "Gameplay",
        }
    }
}

pub struct ModEntry {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ModCategory,
    pub version: &'static str,
    pub downloads: &'static str,
    pub rating: f32,
}

pub const MODS : &[ModEntry] = &[
    ModEntry {
        id: 1,
        name: "OptiFine HD",
        description: "Dramatically improves game performance and adds advanced graphics settings",
        category: ModCategory::Performance,
        version: "1.20.4",
        downloads: "50M+",
        rating: 4.9,
    },
    ModEntry {
        id: 2,
        name: "JEI (Just Enough Items)",
        description: "Item and recipe viewing mod for Minecraft",
        category: ModCategory::Utility,
        version: "1.20.4",
        downloads: "25M+",
        rating: 4.8,
    },
    ModEntry {
        id: 3,
        name: "SEUS Shaders",
        description: "Beautiful realistic shaders that transform the visual experience",
        category: ModCategory::Visual,
        version: "1.20.4",
        downloads: "15M+",
        rating: 4.7,
    },
    ModEntry {
        id: 4,
        name: "Biomes O' Plenty",
        description: "Adds over 75 new biomes and blocks to explore",
        category: ModCategory::Gameplay,
        version: "1.20.4",
        downloads: "20M+",
        rating: 4.6,
    },
    ModEntry {
        id: 5,
        name: "Sodium",
        description: "Modern rendering engine that greatly improves frame rates",
        category: ModCategory::Performance,
        version: "1.20.4",
        downloads: "30M+",
        rating: 4.9,
    },
    ModEntry {
        id: 6,
        name: "Journey Map",
        description: "Real-time mapping in game or in a web browser as you explore",
        category: ModCategory::Utility,
        version: "1.20.4",
        downloads: "18M+",
        rating: 4.5,
    },
];

/// Mods installed on a fresh profile.
pub const DEFAULT_INSTALLED_MODS : [u32; 3] = [1, 3, 5];

/// `None` means every category. Search is case-insensitive over name and description.
pub fn filter_mods<'a>(mods: &'a [ModEntry], search: &str, category: Option<ModCategory>) -> Vec<&'a ModEntry> {
    let needle = search.trim().to_lowercase();
    mods.iter()
        .filter(|m| category.is_none_or(|c| m.category == c))
        .filter(|m| {
            needle.is_empty()
                || m.name.to_lowercase().contains(&needle)
                || m.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Release,
    Mod,
    Tool,
}

impl DownloadKind {
    pub fn label(self) -> &'static str {
        match self {
            DownloadKind::Release => "Release",
            DownloadKind::Mod => "Mod",
            DownloadKind::Tool => "Tool",
        }
    }
}

pub struct DownloadItem {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub size: &'static str,
    pub kind: DownloadKind,
    pub featured: bool,
}

impl DownloadItem {
    pub fn file_name(&self) -> String {
        format!("{}-{}.jar", self.name, self.version)
    }
}

pub const DOWNLOADS : &[DownloadItem] = &[
    DownloadItem {
        name: "Minecraft 1.20.4",
        description: "Latest stable release with new features and bug fixes",
        version: "1.20.4",
        size: "125 MB",
        kind: DownloadKind::Release,
        featured: true,
    },
    DownloadItem {
        name: "Minecraft 1.20.2",
        description: "Previous stable version with excellent mod support",
        version: "1.20.2",
        size: "123 MB",
        kind: DownloadKind::Release,
        featured: false,
    },
    DownloadItem {
        name: "Minecraft 1.19.4",
        description: "Popular version for multiplayer servers",
        version: "1.19.4",
        size: "118 MB",
        kind: DownloadKind::Release,
        featured: false,
    },
    DownloadItem {
        name: "Minecraft 1.18.2",
        description: "Stable version with cave and cliffs features",
        version: "1.18.2",
        size: "115 MB",
        kind: DownloadKind::Release,
        featured: false,
    },
    DownloadItem {
        name: "OptiFine HD",
        description: "Performance enhancement mod for better graphics",
        version: "1.20.4",
        size: "2.8 MB",
        kind: DownloadKind::Mod,
        featured: false,
    },
    DownloadItem {
        name: "Forge Installer",
        description: "Mod loader for Minecraft Java Edition",
        version: "47.2.0",
        size: "1.2 MB",
        kind: DownloadKind::Tool,
        featured: false,
    },
];

pub struct ServerEntry {
    pub name: &'static str,
    pub address: &'static str,
    pub description: &'static str,
    pub players: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
}

pub const SERVERS : &[ServerEntry] = &[
    ServerEntry {
        name: "EaglerCraft Official",
        address: "servers.eaglercraft.com",
        description: "Official EaglerCraft server with multiple game modes",
        players: "124/200",
        version: "1.20.4",
        mode: "Survival",
    },
    ServerEntry {
        name: "Creative World",
        address: "creative.eaglercraft.com",
        description: "Build anything you can imagine in creative mode",
        players: "89/150",
        version: "1.20.4",
        mode: "Creative",
    },
    ServerEntry {
        name: "PvP Arena",
        address: "pvp.eaglercraft.com",
        description: "Competitive PvP battles and tournaments",
        players: "156/300",
        version: "1.19.4",
        mode: "PvP",
    },
    ServerEntry {
        name: "Skyblock Adventures",
        address: "skyblock.eaglercraft.com",
        description: "Start with nothing and build your island empire",
        players: "67/100",
        version: "1.20.2",
        mode: "Skyblock",
    },
];

pub struct QuickStat {
    pub label: &'static str,
    pub value: &'static str,
}

pub const QUICK_STATS : &[QuickStat] = &[
    QuickStat { label: "Servers Online", value: "1,247" },
    QuickStat { label: "Players Active", value: "28,431" },
    QuickStat { label: "Mods Installed", value: "23" },
];
