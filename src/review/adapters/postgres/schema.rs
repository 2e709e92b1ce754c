//! Diesel schema for reviewer assignment persistence.

diesel::table! {
    /// Registered teams keyed by name.
    teams (team_name) {
        /// Unique team name.
        #[max_length = 255]
        team_name -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users and their current team affiliation.
    users (id) {
        /// Client-assigned user identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Display username.
        #[max_length = 255]
        username -> Varchar,
        /// Owning team.
        #[max_length = 255]
        team_name -> Varchar,
        /// Reviewer eligibility flag.
        is_active -> Bool,
        /// Last registration or activity change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pull requests and their lifecycle state.
    pull_requests (id) {
        /// Client-assigned pull request identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Pull request title.
        #[max_length = 255]
        name -> Varchar,
        /// Authoring user.
        #[max_length = 255]
        author_id -> Varchar,
        /// `OPEN` or `MERGED`.
        #[max_length = 16]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Merge timestamp, set once.
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Current reviewer assignments.
    pr_reviewers (pull_request_id, user_id) {
        /// Reviewed pull request.
        #[max_length = 255]
        pull_request_id -> Varchar,
        /// Assigned reviewer.
        #[max_length = 255]
        user_id -> Varchar,
        /// Slot in the pull request's reviewer order.
        position -> Int4,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
    }
}

diesel::joinable!(pr_reviewers -> pull_requests (pull_request_id));

diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests, pr_reviewers);
