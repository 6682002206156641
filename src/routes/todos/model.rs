use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// Offset used for every timestamp leaving the API (Asia/Seoul, no DST).
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// A row of the `todos` table. Timestamps are stored without a zone and are UTC.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(serialize_with = "serialize_offset")]
    pub created_at: DateTime<FixedOffset>,
    #[serde(serialize_with = "serialize_offset")]
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            created_at: naive_utc_to_kst(t.created_at),
            updated_at: naive_utc_to_kst(t.updated_at),
        }
    }
}

pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is within offset range")
}

/// A zoneless timestamp is read as UTC before moving it to KST.
pub fn naive_utc_to_kst(ts: NaiveDateTime) -> DateTime<FixedOffset> {
    to_kst(Utc.from_utc_datetime(&ts))
}

pub fn to_kst<Tz: TimeZone>(ts: DateTime<Tz>) -> DateTime<FixedOffset> {
    ts.with_timezone(&kst())
}

fn serialize_offset<S>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}
