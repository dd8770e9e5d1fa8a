//! SQL schema for the Quire SQLite store.
//!
//! Executed once at connection startup. Every owning column references
//! `users(user_id)` with foreign keys enforced, so a user row cannot be deleted
//! while anything still points at it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL,
    given_name  TEXT NOT NULL DEFAULT '',
    family_name TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    note_id    TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    assoc_id   TEXT NOT NULL,
    title      TEXT NOT NULL,
    contents   TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS editorial_decisions (
    decision_id   TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL,
    stage         TEXT NOT NULL,
    review_round  INTEGER,
    editor_id     TEXT NOT NULL REFERENCES users(user_id),
    decision      TEXT NOT NULL,
    decided_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS review_assignments (
    review_id     TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL,
    reviewer_id   TEXT NOT NULL REFERENCES users(user_id),
    round         INTEGER NOT NULL,
    assigned_at   TEXT NOT NULL,
    completed_at  TEXT
);

CREATE TABLE IF NOT EXISTS signoffs (
    signoff_id   TEXT PRIMARY KEY,
    symbolic     TEXT NOT NULL,
    assoc_id     TEXT NOT NULL,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS email_log (
    log_id        TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL,
    sender_id     TEXT NOT NULL REFERENCES users(user_id),
    subject       TEXT NOT NULL,
    sent_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS event_log (
    log_id        TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    message       TEXT NOT NULL,
    logged_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS submission_comments (
    comment_id    TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL,
    author_id     TEXT NOT NULL REFERENCES users(user_id),
    title         TEXT NOT NULL,
    body          TEXT NOT NULL,
    posted_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS access_keys (
    access_key_id TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    context       TEXT NOT NULL,
    key_hash      TEXT NOT NULL,
    expires_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS individual_subscriptions (
    subscription_id TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    journal_id      TEXT NOT NULL,
    status          TEXT NOT NULL,
    date_start      TEXT,            -- YYYY-MM-DD or NULL (unbounded)
    date_end        TEXT             -- YYYY-MM-DD or NULL (non-expiring)
);

CREATE TABLE IF NOT EXISTS institutional_subscriptions (
    subscription_id  TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(user_id),   -- contact person
    journal_id       TEXT NOT NULL,
    institution_name TEXT NOT NULL,
    status           TEXT NOT NULL,
    date_start       TEXT,
    date_end         TEXT
);

CREATE TABLE IF NOT EXISTS gifts (
    gift_id           TEXT PRIMARY KEY,
    journal_id        TEXT NOT NULL,
    buyer_user_id     TEXT REFERENCES users(user_id) ON DELETE SET NULL,
    recipient_user_id TEXT NOT NULL REFERENCES users(user_id),
    gift_note         TEXT NOT NULL,
    redeemed          INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    ip_address TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS temporary_files (
    file_id     TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    file_name   TEXT NOT NULL,
    file_type   TEXT NOT NULL,
    file_size   INTEGER NOT NULL,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_settings (
    setting_id    TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    setting_name  TEXT NOT NULL,
    locale        TEXT NOT NULL DEFAULT '',
    setting_value TEXT NOT NULL,
    UNIQUE (user_id, setting_name, locale)
);

CREATE TABLE IF NOT EXISTS section_editors (
    assignment_id TEXT PRIMARY KEY,
    journal_id    TEXT NOT NULL,
    section_id    TEXT NOT NULL,
    user_id       TEXT NOT NULL REFERENCES users(user_id)
);

CREATE TABLE IF NOT EXISTS user_user_groups (
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    user_group_id TEXT NOT NULL,
    PRIMARY KEY (user_id, user_group_id)
);

-- One assignment per (submission, group, user), whatever the stage.
CREATE TABLE IF NOT EXISTS stage_assignments (
    stage_assignment_id TEXT PRIMARY KEY,
    submission_id       TEXT NOT NULL,
    stage               TEXT NOT NULL,
    user_group_id       TEXT NOT NULL,
    user_id             TEXT NOT NULL REFERENCES users(user_id),
    assigned_at         TEXT NOT NULL,
    UNIQUE (submission_id, user_group_id, user_id)
);

CREATE INDEX IF NOT EXISTS notes_user_idx            ON notes(user_id);
CREATE INDEX IF NOT EXISTS decisions_editor_idx      ON editorial_decisions(editor_id);
CREATE INDEX IF NOT EXISTS reviews_reviewer_idx      ON review_assignments(reviewer_id);
CREATE INDEX IF NOT EXISTS signoffs_user_idx         ON signoffs(user_id);
CREATE INDEX IF NOT EXISTS email_log_sender_idx      ON email_log(sender_id);
CREATE INDEX IF NOT EXISTS event_log_user_idx        ON event_log(user_id);
CREATE INDEX IF NOT EXISTS comments_author_idx       ON submission_comments(author_id);
CREATE INDEX IF NOT EXISTS access_keys_user_idx      ON access_keys(user_id);
CREATE INDEX IF NOT EXISTS subscriptions_user_idx    ON individual_subscriptions(user_id, journal_id);
CREATE INDEX IF NOT EXISTS inst_subscriptions_idx    ON institutional_subscriptions(user_id);
CREATE INDEX IF NOT EXISTS gifts_recipient_idx       ON gifts(recipient_user_id);
CREATE INDEX IF NOT EXISTS gifts_buyer_idx           ON gifts(buyer_user_id);
CREATE INDEX IF NOT EXISTS sessions_user_idx         ON sessions(user_id);
CREATE INDEX IF NOT EXISTS temporary_files_user_idx  ON temporary_files(user_id);
CREATE INDEX IF NOT EXISTS section_editors_user_idx  ON section_editors(user_id);
CREATE INDEX IF NOT EXISTS stage_assignments_user_idx ON stage_assignments(user_id);

PRAGMA user_version = 1;
";
