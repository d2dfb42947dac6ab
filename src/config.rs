pub const DISK_SIZE: u64 = 70_000_000;
pub const REQUIRED_SPACE: u64 = 30_000_000;
pub const SMALL_DIR_LIMIT: u64 = 100_000;

/// Disk parameters for the directory size puzzle.
#[derive(clap::Args, Clone, Copy, Debug, Eq, PartialEq)]
pub struct DiskConfig {
    /// Total capacity of the device
    #[arg(long, default_value_t = DISK_SIZE)]
    pub disk_size: u64,

    /// Free space the update needs
    #[arg(long, default_value_t = REQUIRED_SPACE)]
    pub required_space: u64,

    /// Largest directory counted by the small directory sum
    #[arg(long, default_value_t = SMALL_DIR_LIMIT)]
    pub small_dir_limit: u64,
}

impl Default for DiskConfig {
    fn default() -> DiskConfig {
        DiskConfig {
            disk_size: DISK_SIZE,
            required_space: REQUIRED_SPACE,
            small_dir_limit: SMALL_DIR_LIMIT,
        }
    }
}

impl DiskConfig {
    /// Space that still has to be freed when `used` bytes are taken. Zero if there is enough.
    pub fn space_to_free(&self, used: u64) -> u64 {
        let free = self.disk_size.saturating_sub(used);
        self.required_space.saturating_sub(free)
    }
}
