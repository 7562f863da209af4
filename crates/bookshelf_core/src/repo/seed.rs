//! Built-in sample records written on first access to a fresh store.
//!
//! # Invariants
//! - IDs are fixed so the demo account, sample books, and sample reviews
//!   stay correlated across collections and across runs.
//! - Seeding content is append-only history: changing existing entries
//!   changes what first-run users see.

use crate::model::book::Book;
use crate::model::review::Review;
use crate::model::user::User;
use uuid::{uuid, Uuid};

pub(crate) const DEMO_USER_ID: Uuid = uuid!("00000000-0000-4000-8000-0000000000a1");

const MOCKINGBIRD_ID: Uuid = uuid!("00000000-0000-4000-8000-0000000000b1");
const NINETEEN_EIGHTY_FOUR_ID: Uuid = uuid!("00000000-0000-4000-8000-0000000000b2");
const GREAT_GATSBY_ID: Uuid = uuid!("00000000-0000-4000-8000-0000000000b3");
const SILENT_PATIENT_ID: Uuid = uuid!("00000000-0000-4000-8000-0000000000b4");

pub(crate) fn demo_user() -> User {
    User::with_id(
        DEMO_USER_ID,
        "demo@bookreviews.com",
        "demo123",
        "Demo User",
        1_709_287_200_000, // 2024-03-01T10:00:00Z
    )
}

pub(crate) fn sample_books() -> Vec<Book> {
    vec![
        Book {
            id: MOCKINGBIRD_ID,
            title: "To Kill a Mockingbird".to_string(),
            author: "Harper Lee".to_string(),
            genre: "Classic Fiction".to_string(),
            description: "A gripping, heart-wrenching, and wholly remarkable tale of coming-of-age in a South poisoned by virulent prejudice.".to_string(),
            cover_image: "https://images.unsplash.com/photo-1419640303358-44f0d27f48e7?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxjbGFzc2ljJTIwbGl0ZXJhdHVyZXxlbnwxfHx8fDE3NTk2NDA1MDl8MA&ixlib=rb-4.1.0&q=80&w=1080".to_string(),
            added_by: DEMO_USER_ID,
            date_added: 1_710_496_800_000, // 2024-03-15T10:00:00Z
        },
        Book {
            id: NINETEEN_EIGHTY_FOUR_ID,
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Dystopian Fiction".to_string(),
            description: "A dystopian social science fiction novel that follows the life of Winston Smith, a low ranking member of the Party.".to_string(),
            cover_image: "https://images.unsplash.com/photo-1599185186578-0ba91c2a15c0?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxmaWN0aW9uJTIwbm92ZWx8ZW58MXx8fHwxNzU5NjQwNTA5fDA&ixlib=rb-4.1.0&q=80&w=1080".to_string(),
            added_by: DEMO_USER_ID,
            date_added: 1_710_410_400_000, // 2024-03-14T10:00:00Z
        },
        Book {
            id: GREAT_GATSBY_ID,
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            genre: "Classic Fiction".to_string(),
            description: "The story primarily concerns the young and mysterious millionaire Jay Gatsby and his quixotic passion for the beautiful Daisy Buchanan.".to_string(),
            cover_image: "https://images.unsplash.com/photo-1652305489491-789257d2e95c?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxib29rJTIwbGlicmFyeSUyMHJlYWRpbmd8ZW58MXx8fHwxNzU5NTgzOTEwfDA&ixlib=rb-4.1.0&q=80&w=1080".to_string(),
            added_by: DEMO_USER_ID,
            date_added: 1_710_324_000_000, // 2024-03-13T10:00:00Z
        },
        Book {
            id: SILENT_PATIENT_ID,
            title: "The Silent Patient".to_string(),
            author: "Alex Michaelides".to_string(),
            genre: "Mystery Thriller".to_string(),
            description: "A shocking psychological thriller of a woman's act of violence against her husband and the therapist obsessed with uncovering her motive.".to_string(),
            cover_image: "https://images.unsplash.com/photo-1698954634383-eba274a1b1c7?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxteXN0ZXJ5JTIwdGhyaWxsZXIlMjBib29rfGVufDF8fHx8MTc1OTU5NDMyNnww&ixlib=rb-4.1.0&q=80&w=1080".to_string(),
            added_by: DEMO_USER_ID,
            date_added: 1_710_237_600_000, // 2024-03-12T10:00:00Z
        },
    ]
}

pub(crate) fn sample_reviews() -> Vec<Review> {
    vec![
        Review {
            id: uuid!("00000000-0000-4000-8000-0000000000c1"),
            book_id: MOCKINGBIRD_ID,
            user_id: DEMO_USER_ID,
            user_name: "Demo User".to_string(),
            rating: 5,
            review_text: "An absolute masterpiece! This book beautifully captures the essence of morality and justice through the eyes of a child.".to_string(),
            date: 1_710_583_200_000, // 2024-03-16T10:00:00Z
        },
        Review {
            id: uuid!("00000000-0000-4000-8000-0000000000c2"),
            book_id: NINETEEN_EIGHTY_FOUR_ID,
            user_id: DEMO_USER_ID,
            user_name: "Demo User".to_string(),
            rating: 5,
            review_text: "Eerily prophetic and deeply disturbing. Orwell's vision of a totalitarian future remains relevant today.".to_string(),
            date: 1_710_496_800_000, // 2024-03-15T10:00:00Z
        },
        Review {
            id: uuid!("00000000-0000-4000-8000-0000000000c3"),
            book_id: GREAT_GATSBY_ID,
            user_id: DEMO_USER_ID,
            user_name: "Demo User".to_string(),
            rating: 4,
            review_text: "A brilliant portrayal of the American Dream and its corruption. Fitzgerald's prose is simply beautiful.".to_string(),
            date: 1_710_410_400_000, // 2024-03-14T10:00:00Z
        },
    ]
}
