use crate::config::settings::AppLanguage;

/// Dashboard headings in the configured interface language.
pub struct Labels {
    pub prayers: &'static str,
    pub next_prayer: &'static str,
    pub last_read: &'static str,
    pub khatam: &'static str,
    pub now: &'static str,
    pub tomorrow: &'static str,
    pub no_reading: &'static str,
    pub no_plan: &'static str,
    pub day: &'static str,
    pub pages: &'static str,
    pub per_day: &'static str,
    pub bookmarks: &'static str,
    pub qibla: &'static str,
}

const EN: Labels = Labels {
    prayers: " Prayer Times ",
    next_prayer: " Next Prayer ",
    last_read: " Last Read ",
    khatam: " Khatam ",
    now: "now",
    tomorrow: "tomorrow",
    no_reading: "Nothing read yet",
    no_plan: "No plan · tilawah khatam start 30",
    day: "Day",
    pages: "pages",
    per_day: "a day",
    bookmarks: "bookmarks",
    qibla: "Qibla",
};

const ID: Labels = Labels {
    prayers: " Jadwal Sholat ",
    next_prayer: " Sholat Berikutnya ",
    last_read: " Terakhir Dibaca ",
    khatam: " Khatam ",
    now: "sekarang",
    tomorrow: "besok",
    no_reading: "Belum ada bacaan",
    no_plan: "Belum ada rencana · tilawah khatam start 30",
    day: "Hari",
    pages: "halaman",
    per_day: "per hari",
    bookmarks: "penanda",
    qibla: "Kiblat",
};

pub fn labels(lang: AppLanguage) -> &'static Labels {
    match lang {
        AppLanguage::En => &EN,
        AppLanguage::Id => &ID,
    }
}
