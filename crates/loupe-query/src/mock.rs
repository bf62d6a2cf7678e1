//! Local mock execution strategy.
//!
//! Answers questions from a fixed catalog of GA4 sample results keyed by
//! keyword lists. Used when the backend is unreachable or explicitly
//! selected, and in tests. Well-formed input never fails on this path:
//! an unmatched question gets a fixed fallback result.

use rand::Rng;
use tokio::time::{sleep, Duration};

use loupe_core::{CellValue, QueryResult, Row};

use crate::error::QueryError;

/// Minimum keyword hits for a catalog entry to match.
const MATCH_THRESHOLD: usize = 2;

/// Simulated latency range, to exercise the same in-progress UI states as
/// the remote path.
const LATENCY_MS: (u64, u64) = (1000, 2000);

/// Executes questions against the local sample catalog.
pub struct MockStrategy {
    latency_ms: Option<(u64, u64)>,
}

impl Default for MockStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStrategy {
    pub fn new() -> Self {
        Self {
            latency_ms: Some(LATENCY_MS),
        }
    }

    /// A strategy without simulated latency, for tests.
    pub fn instant() -> Self {
        Self { latency_ms: None }
    }

    /// Execute one question against the catalog.
    ///
    /// The artificial delay is a scheduled resumption, never a busy wait.
    pub async fn execute(&self, question: &str) -> Result<QueryResult, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        if let Some((lo, hi)) = self.latency_ms {
            let wait = rand::rng().random_range(lo..hi);
            sleep(Duration::from_millis(wait)).await;
        }

        Ok(find_catalog_result(question))
    }
}

/// Keyword-match the question against the catalog.
///
/// The question is case-folded; each entry's keyword substring hits are
/// counted in declared order and the first entry with at least
/// [`MATCH_THRESHOLD`] hits wins. No scoring, no tie-breaking beyond
/// declaration order.
pub fn find_catalog_result(question: &str) -> QueryResult {
    let normalized = question.to_lowercase();

    for entry in CATALOG {
        let hits = entry
            .keywords
            .iter()
            .filter(|keyword| normalized.contains(*keyword))
            .count();
        if hits >= MATCH_THRESHOLD {
            return (entry.build)();
        }
    }

    fallback_result(question)
}

struct CatalogEntry {
    keywords: &'static [&'static str],
    build: fn() -> QueryResult,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        keywords: &["총", "전체", "이벤트", "수", "개수"],
        build: total_events,
    },
    CatalogEntry {
        keywords: &["이벤트", "유형", "타입", "상위", "많이"],
        build: top_event_types,
    },
    CatalogEntry {
        keywords: &["국가", "사용자", "지역"],
        build: users_by_country,
    },
    CatalogEntry {
        keywords: &["기기", "디바이스", "모바일", "데스크톱", "비율"],
        build: users_by_device,
    },
    CatalogEntry {
        keywords: &["시간", "시간대", "hour"],
        build: events_by_hour,
    },
    CatalogEntry {
        keywords: &["운영체제", "os", "분포", "시스템"],
        build: users_by_os,
    },
];

fn fallback_result(question: &str) -> QueryResult {
    QueryResult {
        question: question.to_string(),
        generated_sql: "SELECT 'Mock Data' as message, 42 as answer;".to_string(),
        rows: vec![Row::from_pairs([
            ("message", CellValue::from("목업 데이터입니다")),
            ("answer", CellValue::Int(42)),
        ])],
        row_count: 1,
    }
}

fn total_events() -> QueryResult {
    QueryResult {
        question: "총 이벤트 수를 알려주세요".to_string(),
        generated_sql:
            "SELECT COUNT(*) as total_events FROM `nlq-ex.test_dataset.events_20201121`;"
                .to_string(),
        rows: vec![Row::from_pairs([("total_events", CellValue::Int(41980))])],
        row_count: 1,
    }
}

fn top_event_types() -> QueryResult {
    let counts = [
        ("page_view", 15487),
        ("user_engagement", 8932),
        ("scroll", 7321),
        ("click", 4985),
        ("session_start", 3442),
        ("first_visit", 1813),
        ("purchase", 892),
        ("add_to_cart", 634),
        ("view_item", 421),
        ("begin_checkout", 263),
    ];
    QueryResult {
        question: "가장 많이 발생한 이벤트 유형 상위 10개를 보여주세요".to_string(),
        generated_sql: "SELECT event_name, COUNT(*) as event_count FROM \
                        `nlq-ex.test_dataset.events_20201121` GROUP BY event_name \
                        ORDER BY event_count DESC LIMIT 10;"
            .to_string(),
        rows: counts
            .iter()
            .map(|(name, count)| {
                Row::from_pairs([
                    ("event_name", CellValue::from(*name)),
                    ("event_count", CellValue::Int(*count)),
                ])
            })
            .collect(),
        row_count: 10,
    }
}

fn users_by_country() -> QueryResult {
    let counts = [
        ("United States", 8934),
        ("United Kingdom", 3421),
        ("Canada", 2876),
        ("Germany", 2453),
        ("France", 1987),
        ("Australia", 1654),
        ("Japan", 1432),
        ("South Korea", 1298),
        ("Netherlands", 987),
        ("Brazil", 876),
    ];
    QueryResult {
        question: "국가별 사용자 수를 보여주세요".to_string(),
        generated_sql: "SELECT geo.country, COUNT(DISTINCT user_pseudo_id) as unique_users \
                        FROM `nlq-ex.test_dataset.events_20201121` GROUP BY geo.country \
                        ORDER BY unique_users DESC;"
            .to_string(),
        rows: counts
            .iter()
            .map(|(country, users)| {
                Row::from_pairs([
                    ("country", CellValue::from(*country)),
                    ("unique_users", CellValue::Int(*users)),
                ])
            })
            .collect(),
        row_count: 10,
    }
}

fn users_by_device() -> QueryResult {
    let shares: [(&str, i64, f64); 3] = [
        ("mobile", 18456, 62.34),
        ("desktop", 9823, 33.21),
        ("tablet", 1321, 4.45),
    ];
    QueryResult {
        question: "모바일과 데스크톱 사용자 비율을 보여주세요".to_string(),
        generated_sql: "SELECT device.category, COUNT(DISTINCT user_pseudo_id) as users, \
                        ROUND(COUNT(DISTINCT user_pseudo_id) * 100.0 / (SELECT \
                        COUNT(DISTINCT user_pseudo_id) FROM \
                        `nlq-ex.test_dataset.events_20201121`), 2) as percentage FROM \
                        `nlq-ex.test_dataset.events_20201121` GROUP BY device.category \
                        ORDER BY users DESC;"
            .to_string(),
        rows: shares
            .iter()
            .map(|(category, users, percentage)| {
                Row::from_pairs([
                    ("category", CellValue::from(*category)),
                    ("users", CellValue::Int(*users)),
                    ("percentage", CellValue::Float(*percentage)),
                ])
            })
            .collect(),
        row_count: 3,
    }
}

fn events_by_hour() -> QueryResult {
    const HOURLY_COUNTS: [i64; 24] = [
        1234, 987, 743, 654, 789, 1123, 1567, 2134, 2987, 3456, 3789, 3923, 4123, 3987, 3654,
        3234, 2987, 2654, 2321, 2134, 1987, 1654, 1432, 1234,
    ];
    QueryResult {
        question: "시간대별 이벤트 수를 보여주세요".to_string(),
        generated_sql: "SELECT EXTRACT(HOUR FROM TIMESTAMP_MICROS(event_timestamp)) as hour, \
                        COUNT(*) as event_count FROM `nlq-ex.test_dataset.events_20201121` \
                        GROUP BY hour ORDER BY hour;"
            .to_string(),
        rows: HOURLY_COUNTS
            .iter()
            .enumerate()
            .map(|(hour, count)| {
                Row::from_pairs([
                    ("hour", CellValue::Int(hour as i64)),
                    ("event_count", CellValue::Int(*count)),
                ])
            })
            .collect(),
        row_count: 24,
    }
}

fn users_by_os() -> QueryResult {
    let counts = [
        ("Android", 12456),
        ("iOS", 8934),
        ("Windows", 6789),
        ("Macintosh", 2345),
        ("Linux", 876),
        ("Chrome OS", 234),
    ];
    QueryResult {
        question: "운영체제별 사용자 분포를 보여주세요".to_string(),
        generated_sql: "SELECT device.operating_system, COUNT(DISTINCT user_pseudo_id) as \
                        users FROM `nlq-ex.test_dataset.events_20201121` GROUP BY \
                        device.operating_system ORDER BY users DESC;"
            .to_string(),
        rows: counts
            .iter()
            .map(|(os, users)| {
                Row::from_pairs([
                    ("operating_system", CellValue::from(*os)),
                    ("users", CellValue::Int(*users)),
                ])
            })
            .collect(),
        row_count: 6,
    }
}

// =============================================================================
// Tests
// =============================================================================
