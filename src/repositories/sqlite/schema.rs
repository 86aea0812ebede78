// SQLite table definitions. Timestamps are fixed-width RFC 3339 text.

diesel::table! {
    users (id) {
        id -> Text,
        email -> Text,
        name -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    stories (id) {
        id -> Text,
        title -> Text,
        author -> Text,
        content -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, stories);
