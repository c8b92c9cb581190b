//! Fixed name pools and the pre-authored account roster.

use crate::model::{Identity, VerificationTier};

pub const MALE_NAMES: &[&str] = &[
    "Mohammed", "Ahmed", "Ali", "Omar", "Khalid", "Abdullah", "Yousef", "Ibrahim", "Saad", "Fahad",
    "Salman", "Abdulaziz", "Faisal", "Turki", "Badr", "Nasser", "Rashid", "Majed", "Sultan", "Nawaf",
    "Waleed", "Tariq", "Ziad", "Sami", "Mishari", "Muath", "Yazeed", "Hisham", "Hatem", "Firas",
    "Basel", "Rayan", "Anas", "Hamza", "Osama", "Ammar", "Ayman", "Muhannad", "Karim", "Jassim",
    "Hamad", "Khalifa", "Zayed", "Mansour", "Saeed", "Mubarak", "Salem", "Ghanem", "Marwan", "Adel",
];

pub const FEMALE_NAMES: &[&str] = &[
    "Sara", "Noura", "Reem", "Mona", "Fatima", "Aisha", "Maryam", "Zainab", "Lujain", "Hind",
    "Amal", "Maha", "Nada", "Alanoud", "Aljawhara", "Dana", "Shahad", "Ghaida", "Rawan", "Layan",
    "Jood", "Lama", "Hala", "Raghad", "Bayan", "Asma", "Khadija", "Sumaya", "Dalal", "Manal",
    "Hadeel", "Suad", "Nawal", "Bashayer", "Arwa", "Taghreed", "Jamila", "Latifa", "Haya", "Wafa",
    "Mai", "Yara", "Salma", "Lamia", "Nouf", "Wadha", "Sheikha", "Maitha", "Alia", "Fajr",
];

pub const LAST_NAMES: &[&str] = &[
    "Al Saeed", "Al Ghamdi", "Al Otaibi", "Al Qahtani", "Al Omari", "Al Harbi", "Al Dosari", "Al Mutairi",
    "Al Azmi", "Al Shammari", "Al Enezi", "Al Malki", "Al Zahrani", "Al Shehri", "Al Subaie", "Al Khalidi",
    "Al Tamimi", "Al Rashidi", "Al Harthi", "Al Asiri", "Al Yami", "Al Shahrani", "Al Najjar", "Al Haddad",
    "Kamel", "Hassan", "Ismail", "Jumaa", "Abdulrahman", "Saleh", "Al Mansouri", "Al Falasi",
    "Al Nuaimi", "Al Dhaheri", "Al Ketbi", "Al Ameri", "Al Marri", "Al Hilali", "Al Sabah", "Al Nahyan",
];

/// One pre-authored account: (id, name, username, avatar, verified, followers, bio).
type RosterRow = (&'static str, &'static str, &'static str, &'static str, bool, u64, &'static str);

const REALISTIC_ROWS: &[RosterRow] = &[
    ("u2", "Dr. Huda Al Omar", "dr_huda", "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?w=400&fit=crop", true, 45_000, "Pediatrician | child and family health"),
    ("u3", "Chef Omar", "chef_omar", "https://images.unsplash.com/photo-1583394293214-28ded15ee548?w=400&fit=crop", false, 8_900, "Cooking with love | eastern and western recipes"),
    ("u4", "Layla Designs", "layla_des", "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=400&fit=crop", true, 15_200, "UX/UI designer sharing work"),
    ("u5", "Yasser Gamer", "yasser_play", "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=400&fit=crop", false, 3_200, "Live every day | PUBG & FIFA"),
    ("u6", "Sara Al Qahtani", "sara_q", "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=400&fit=crop", false, 1_200, "Diary of a med student"),
    ("u7", "Fahad Tech", "fahad_tech", "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=400&fit=crop", true, 67_000, "Phone and gadget reviews"),
    ("u8", "Noura Lifestyle", "noura_life", "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=400&fit=crop", false, 22_000, "Fashion | beauty | travel"),
    ("u9", "Captain Majed", "majed_fit", "https://images.unsplash.com/photo-1570295999919-56ceb5ecca61?w=400&fit=crop", false, 5_600, "Personal trainer | nutrition tips"),
    ("u10", "The Arab Traveler", "arab_traveler", "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&fit=crop", true, 33_000, "Discovering the world"),
    ("u11", "Reem Paints", "reem_art", "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=400&fit=crop", false, 4_100, "Oil painting"),
    ("u12", "Ahmed Codes", "ahmed_dev", "https://images.unsplash.com/photo-1519345182560-3f2917c472ef?w=400&fit=crop", false, 2_800, "Full stack dev"),
    ("u13", "Book Lovers", "books_lover", "https://images.unsplash.com/photo-1491349174775-aaafddd81942?w=400&fit=crop", false, 9_500, "Quotes and book reviews"),
    ("u14", "Faisal Realty", "faisal_home", "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=400&fit=crop", true, 11_000, "Real estate advisor in Riyadh"),
    ("u15", "Cars World", "cars_world", "https://images.unsplash.com/photo-1552374196-c4e7ffc6e126?w=400&fit=crop", false, 18_000, "Motor show coverage"),
    ("u16", "Mona MUA", "mona_mua", "https://images.unsplash.com/photo-1531123897727-8f129e1688ce?w=400&fit=crop", false, 7_500, "Makeup artist"),
    ("u17", "Sultan Comedy", "sultan_fun", "https://images.unsplash.com/photo-1542909168-82c3e7fdca5c?w=400&fit=crop", true, 150_000, "Sketches and funny clips"),
    ("u18", "Eng. Tariq", "tariq_eng", "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=400&fit=crop", false, 6_200, "Architecture and interior design"),
    ("u19", "Cinema Club", "cinema_club", "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?w=400&fit=crop", false, 14_000, "Film and series picks"),
    ("u20", "Cat Fans", "cats_fans", "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=400&fit=crop", false, 25_000, "Cute cat photos and clips"),
];

/// A pre-authored account plus its bio.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub identity: Identity,
    pub bio: &'static str,
}

/// The pre-authored realistic accounts, in roster order.
pub fn realistic_roster() -> Vec<RosterEntry> {
    REALISTIC_ROWS
        .iter()
        .enumerate()
        .map(|(i, row)| RosterEntry {
            identity: realistic_identity(i),
            bio: row.6,
        })
        .collect()
}

/// Number of pre-authored accounts.
pub fn realistic_len() -> usize {
    REALISTIC_ROWS.len()
}

/// The pre-authored identity at `index` (must be `< realistic_len()`).
pub fn realistic_identity(index: usize) -> Identity {
    let (id, name, username, avatar, verified, followers, _) = REALISTIC_ROWS[index];
    let mut identity = Identity::new(id, name, username, avatar);
    if verified {
        identity = identity.verified(VerificationTier::Blue);
    }
    identity.followers = followers;
    identity
}

/// Lowercase ASCII slug of a name part: spaces become nothing, other
/// non-alphanumerics are dropped.
pub fn slug(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Avatar URL for a display name.
pub fn avatar_url(name: &str, seed: Option<u64>) -> String {
    let mut url = format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff&size=128",
        urlencoding::encode(name)
    );
    if let Some(seed) = seed {
        url.push_str(&format!("&seed={seed}"));
    }
    url
}
