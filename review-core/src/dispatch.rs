//! The analysis dispatcher: priority ordering, cache-aware fan-out, and
//! bucket merging.
//!
//! Files are processed strictly one at a time, chunks within a file one at
//! a time; each capability call is a blocking round trip from the
//! pipeline's point of view. The cache makes identical content under
//! different paths cost one call total. The architecture kind is the single
//! whole-codebase pass and runs after all per-file passes, uncached and
//! unchunked, since its value comes from seeing the complete layout.

use std::cmp::Reverse;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use code_ingest::chunk::chunk_lines;
use code_ingest::ingest::{detect_project_type, file_tree};
use code_ingest::types::FileRecord;

use crate::cache::AnalysisCache;
use crate::capability::AnalysisCapability;
use crate::errors::ReviewResult;
use crate::parse::{self, ParseError};
use crate::prompts;
use crate::types::{AggregatedResult, AnalysisFailure, AnalysisKind};

/// Soft per-chunk character bound for per-file analysis calls.
pub const DEFAULT_CHUNK_CHARS: usize = 8000;

/// Earlier keyword = higher priority; files matching none score 0.
const PRIORITY_KEYWORDS: [&str; 9] = [
    "main", "index", "app", "server", "config", "auth", "security", "database", "api",
];

/// Path listing cap for the architecture request; the rest is elided with a
/// count so the model knows the listing is partial.
const ARCH_MAX_TREE_PATHS: usize = 400;
const ARCH_SNIPPET_FILES: usize = 5;
const ARCH_SNIPPET_CHARS: usize = 1500;

/// Orders files by descending heuristic priority.
///
/// The score is derived from the first priority keyword contained in the
/// lowered base name. The sort is stable: files with equal scores keep
/// their relative input order.
pub fn prioritize(files: &[FileRecord]) -> Vec<&FileRecord> {
    let mut ordered: Vec<&FileRecord> = files.iter().collect();
    ordered.sort_by_key(|f| Reverse(priority_score(&f.name)));
    ordered
}

fn priority_score(name: &str) -> usize {
    let lowered = name.to_lowercase();
    PRIORITY_KEYWORDS
        .iter()
        .position(|keyword| lowered.contains(keyword))
        .map(|i| PRIORITY_KEYWORDS.len() - i)
        .unwrap_or(0)
}

/// Cache-aware dispatcher over a generic [`AnalysisCapability`].
#[derive(Debug)]
pub struct CodeAnalyzer<C> {
    capability: C,
    cache: AnalysisCache,
    chunk_chars: usize,
}

impl<C: AnalysisCapability> CodeAnalyzer<C> {
    pub fn new(capability: C, cache: AnalysisCache) -> Self {
        Self {
            capability,
            cache,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    /// Overrides the per-chunk character bound.
    pub fn chunk_chars(mut self, limit: usize) -> Self {
        self.chunk_chars = limit;
        self
    }

    /// Runs every enabled analysis kind over the ingested files and folds
    /// the results into one aggregate.
    ///
    /// Degradation never aborts the run: an unavailable capability yields
    /// empty per-kind results, and failed or malformed calls are recorded
    /// in `analysis_errors` with their result treated as empty.
    ///
    /// The architecture kind runs once over the whole file set, after all
    /// per-file kinds. When no files were ingested there is no codebase to
    /// review, so the pass is skipped and the empty placeholder stands.
    ///
    /// # Errors
    /// Only cache write failures propagate.
    pub async fn analyze_codebase(
        &self,
        files: &[FileRecord],
        kinds: &[AnalysisKind],
    ) -> ReviewResult<AggregatedResult> {
        let mut agg = AggregatedResult::seed(files);

        if !self.capability.is_available() {
            warn!("analysis capability unavailable; per-kind results stay empty");
            return Ok(agg);
        }

        let ordered = prioritize(files);
        for file in &ordered {
            let fingerprint = AnalysisCache::fingerprint(&file.content);
            for kind in kinds {
                match kind {
                    AnalysisKind::Security => {
                        let items = self
                            .file_items(
                                &fingerprint,
                                *kind,
                                file,
                                parse::parse_security,
                                &mut agg.analysis_errors,
                            )
                            .await?;
                        for item in items {
                            agg.security.push(item);
                        }
                    }
                    AnalysisKind::Performance => {
                        let items = self
                            .file_items(
                                &fingerprint,
                                *kind,
                                file,
                                parse::parse_performance,
                                &mut agg.analysis_errors,
                            )
                            .await?;
                        for item in items {
                            agg.performance.push(item);
                        }
                    }
                    AnalysisKind::Style => {
                        let items = self
                            .file_items(
                                &fingerprint,
                                *kind,
                                file,
                                parse::parse_style,
                                &mut agg.analysis_errors,
                            )
                            .await?;
                        for item in items {
                            agg.style.push(item);
                        }
                    }
                    // Whole-codebase pass, handled after the per-file loop.
                    AnalysisKind::Architecture => {}
                }
            }
        }

        if kinds.contains(&AnalysisKind::Architecture) && !files.is_empty() {
            self.architecture_pass(files, &ordered, &mut agg).await;
        }

        agg.fold_score();
        info!(
            files = agg.files_count,
            security = agg.security.total(),
            performance = agg.performance.total(),
            style = agg.style.total(),
            errors = agg.analysis_errors.len(),
            score = agg.overall_score,
            "codebase analysis finished"
        );
        Ok(agg)
    }

    /// Produces the item list for one `(file, kind)` pair: cache hit, or
    /// chunked capability calls whose per-chunk items are concatenated and
    /// stored.
    ///
    /// Parse failures yield an empty per-call result and are cached like
    /// any other result; transport failures are transient, so the payload
    /// is not cached when one occurred.
    async fn file_items<T>(
        &self,
        fingerprint: &str,
        kind: AnalysisKind,
        file: &FileRecord,
        parse_items: fn(&str) -> Result<Vec<T>, ParseError>,
        failures: &mut Vec<AnalysisFailure>,
    ) -> ReviewResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(hit) = self.cache.get::<Vec<T>>(fingerprint, kind).await {
            debug!(path = %file.path, kind = %kind, "cache hit");
            return Ok(hit);
        }

        let chunks = chunk_lines(&file.content, self.chunk_chars);
        debug!(path = %file.path, kind = %kind, chunks = chunks.len(), "cache miss; dispatching");

        let mut items = Vec::new();
        let mut capability_failed = false;
        for chunk in &chunks {
            let request = prompts::render_request(&file.path, chunk, kind);
            match self
                .capability
                .analyze(prompts::system_prompt(kind), &request, kind)
                .await
            {
                Ok(raw) => match parse_items(&raw) {
                    Ok(mut parsed) => items.append(&mut parsed),
                    Err(err) => {
                        warn!(path = %file.path, kind = %kind, %err, "malformed analysis output; treating as empty");
                        failures.push(AnalysisFailure {
                            path: file.path.clone(),
                            kind,
                            reason: format!("malformed output: {err}"),
                        });
                    }
                },
                Err(err) => {
                    warn!(path = %file.path, kind = %kind, %err, "analysis call failed");
                    capability_failed = true;
                    failures.push(AnalysisFailure {
                        path: file.path.clone(),
                        kind,
                        reason: format!("capability failure: {err}"),
                    });
                }
            }
        }

        if !capability_failed {
            self.cache.put(fingerprint, kind, &items).await?;
        }
        Ok(items)
    }

    async fn architecture_pass(
        &self,
        files: &[FileRecord],
        ordered: &[&FileRecord],
        agg: &mut AggregatedResult,
    ) {
        let request = architecture_request(files, ordered);
        match self
            .capability
            .analyze(
                prompts::system_prompt(AnalysisKind::Architecture),
                &request,
                AnalysisKind::Architecture,
            )
            .await
        {
            Ok(raw) => match parse::parse_architecture(&raw) {
                Ok(review) => agg.architecture = review,
                Err(err) => {
                    warn!(%err, "malformed architecture output; treating as empty");
                    agg.analysis_errors.push(AnalysisFailure {
                        path: "(whole codebase)".to_string(),
                        kind: AnalysisKind::Architecture,
                        reason: format!("malformed output: {err}"),
                    });
                }
            },
            Err(err) => {
                warn!(%err, "architecture analysis call failed");
                agg.analysis_errors.push(AnalysisFailure {
                    path: "(whole codebase)".to_string(),
                    kind: AnalysisKind::Architecture,
                    reason: format!("capability failure: {err}"),
                });
            }
        }
    }
}

/// Builds the whole-codebase request: project flavor, a capped structure
/// listing, and the top prioritized files truncated to snippet size.
fn architecture_request(files: &[FileRecord], ordered: &[&FileRecord]) -> String {
    let tree = file_tree(files);
    let mut paths: Vec<&str> = tree.lines().collect();
    let elided = paths.len().saturating_sub(ARCH_MAX_TREE_PATHS);
    paths.truncate(ARCH_MAX_TREE_PATHS);
    let mut listing = paths.join("\n");
    if elided > 0 {
        listing.push_str(&format!("\n… and {elided} more files"));
    }

    let snippets: Vec<(String, String)> = ordered
        .iter()
        .take(ARCH_SNIPPET_FILES)
        .map(|f| (f.path.clone(), truncate_chars(&f.content, ARCH_SNIPPET_CHARS)))
        .collect();

    prompts::render_architecture_request(detect_project_type(files), &listing, &snippets)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &s[..byte_idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct ScriptedCapability {
        calls: Arc<Mutex<Vec<(AnalysisKind, String)>>>,
        security_json: String,
        performance_json: String,
        style_json: String,
        architecture_json: String,
    }

    impl Default for ScriptedCapability {
        fn default() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                security_json:
                    r#"{"findings": [{"SEVERITY": "High", "DESCRIPTION": "hardcoded secret"}]}"#
                        .to_string(),
                performance_json:
                    r#"{"suggestions": [{"impact": "high", "issue": "n+1 query"}]}"#.to_string(),
                style_json: r#"{"issues": [{"SEVERITY": "Low", "description": "naming"}]}"#
                    .to_string(),
                architecture_json:
                    r#"{"issues": [{"category": "coupling"}], "recommendations": [{"title": "split"}]}"#
                        .to_string(),
            }
        }
    }

    impl AnalysisCapability for ScriptedCapability {
        async fn analyze(
            &self,
            _system_prompt: &str,
            content: &str,
            kind: AnalysisKind,
        ) -> Result<String, CapabilityError> {
            self.calls
                .lock()
                .unwrap()
                .push((kind, content.to_string()));
            Ok(match kind {
                AnalysisKind::Security => self.security_json.clone(),
                AnalysisKind::Performance => self.performance_json.clone(),
                AnalysisKind::Style => self.style_json.clone(),
                AnalysisKind::Architecture => self.architecture_json.clone(),
            })
        }
    }

    struct FailingCapability;

    impl AnalysisCapability for FailingCapability {
        async fn analyze(
            &self,
            _system_prompt: &str,
            _content: &str,
            _kind: AnalysisKind,
        ) -> Result<String, CapabilityError> {
            Err(CapabilityError::Backend("connection refused".to_string()))
        }
    }

    fn rec(name: &str, path: &str, content: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: path.to_string(),
            content: content.to_string(),
            language: "python",
            size: content.len() as u64,
        }
    }

    #[test]
    fn prioritize_is_stable_and_keyword_driven() {
        let files = vec![
            rec("utils.py", "utils.py", "a"),
            rec("main.py", "main.py", "b"),
            rec("readme.md", "readme.md", "c"),
        ];
        let ordered = prioritize(&files);
        let names: Vec<&str> = ordered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["main.py", "utils.py", "readme.md"]);
    }

    #[test]
    fn earlier_keyword_outranks_later_one() {
        let files = vec![
            rec("api_routes.py", "api_routes.py", "a"),
            rec("auth.py", "auth.py", "b"),
            rec("index.js", "index.js", "c"),
        ];
        let ordered = prioritize(&files);
        let names: Vec<&str> = ordered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["index.js", "auth.py", "api_routes.py"]);
    }

    #[tokio::test]
    async fn identical_content_is_analyzed_once() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability::default();
        let calls = capability.calls.clone();
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let files = vec![
            rec("a.py", "src/a.py", "shared = True\n"),
            rec("b.py", "vendor/b.py", "shared = True\n"),
        ];
        let agg = analyzer
            .analyze_codebase(&files, &[AnalysisKind::Security])
            .await
            .unwrap();

        // One distinct fingerprint, one capability invocation; the second
        // file is served from cache but still merged.
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(agg.security.high.len(), 2);
        assert_eq!(agg.files_count, 2);
    }

    #[tokio::test]
    async fn second_run_is_served_entirely_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![rec("app.py", "app.py", "x = 1\n")];

        let first = ScriptedCapability::default();
        let first_calls = first.calls.clone();
        CodeAnalyzer::new(first, AnalysisCache::new(dir.path()))
            .analyze_codebase(&files, &[AnalysisKind::Security, AnalysisKind::Performance])
            .await
            .unwrap();
        assert_eq!(first_calls.lock().unwrap().len(), 2);

        let second = ScriptedCapability::default();
        let second_calls = second.calls.clone();
        let agg = CodeAnalyzer::new(second, AnalysisCache::new(dir.path()))
            .analyze_codebase(&files, &[AnalysisKind::Security, AnalysisKind::Performance])
            .await
            .unwrap();
        assert_eq!(second_calls.lock().unwrap().len(), 0);
        assert_eq!(agg.security.high.len(), 1);
        assert_eq!(agg.performance.high.len(), 1);
    }

    #[tokio::test]
    async fn oversized_file_is_chunked_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability::default();
        let calls = capability.calls.clone();
        let analyzer =
            CodeAnalyzer::new(capability, AnalysisCache::new(dir.path())).chunk_chars(16);

        let files = vec![rec("big.py", "big.py", "aaaa\nbbbb\ncccc\ndddd")];
        let agg = analyzer
            .analyze_codebase(&files, &[AnalysisKind::Security])
            .await
            .unwrap();

        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().all(|(_, c)| c.contains("File: big.py")));
        // One finding per chunk, concatenated into the file payload.
        assert_eq!(agg.security.high.len(), 2);
    }

    #[tokio::test]
    async fn unknown_tiers_fall_to_default_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability {
            security_json: r#"{"findings": [{"DESCRIPTION": "no severity"},
                {"SEVERITY": "moderate", "DESCRIPTION": "synonym"}]}"#
                .to_string(),
            performance_json: r#"{"suggestions": [{"impact": "moderate"}]}"#.to_string(),
            ..Default::default()
        };
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let files = vec![rec("app.py", "app.py", "x = 1\n")];
        let agg = analyzer
            .analyze_codebase(&files, &[AnalysisKind::Security, AnalysisKind::Performance])
            .await
            .unwrap();

        assert_eq!(agg.security.info.len(), 2);
        assert_eq!(agg.performance.low.len(), 1);
        assert!(agg.security.high.is_empty());
    }

    #[tokio::test]
    async fn disabled_kinds_yield_empty_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability::default();
        let calls = capability.calls.clone();
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let files = vec![
            rec("a.py", "a.py", "x = 1\n"),
            rec("b.py", "b.py", "y = 2\n"),
        ];
        let agg = analyzer.analyze_codebase(&files, &[]).await.unwrap();

        assert_eq!(calls.lock().unwrap().len(), 0);
        assert_eq!(agg.files_count, 2);
        assert_eq!(agg.security.total(), 0);
        assert_eq!(agg.performance.total(), 0);
        assert_eq!(agg.style.total(), 0);
        assert_eq!(agg.overall_score, 100);
        assert_eq!(agg.files_summary.len(), 2);
    }

    #[tokio::test]
    async fn null_capability_degrades_to_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer =
            CodeAnalyzer::new(crate::capability::NullCapability, AnalysisCache::new(dir.path()));

        let files = vec![rec("main.py", "main.py", "x = 1\n")];
        let agg = analyzer
            .analyze_codebase(
                &files,
                &[
                    AnalysisKind::Security,
                    AnalysisKind::Performance,
                    AnalysisKind::Architecture,
                    AnalysisKind::Style,
                ],
            )
            .await
            .unwrap();

        assert_eq!(agg.files_count, 1);
        assert_eq!(agg.security.total(), 0);
        assert!(agg.architecture.issues.is_empty());
    }

    #[tokio::test]
    async fn capability_failure_is_recorded_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![rec("app.py", "app.py", "x = 1\n")];

        let agg = CodeAnalyzer::new(FailingCapability, AnalysisCache::new(dir.path()))
            .analyze_codebase(&files, &[AnalysisKind::Security])
            .await
            .unwrap();
        assert_eq!(agg.security.total(), 0);
        assert_eq!(agg.analysis_errors.len(), 1);
        assert_eq!(agg.analysis_errors[0].kind, AnalysisKind::Security);

        // The failed call must not poison the cache; a healthy capability
        // re-analyzes the same content.
        let retry = ScriptedCapability::default();
        let retry_calls = retry.calls.clone();
        let agg = CodeAnalyzer::new(retry, AnalysisCache::new(dir.path()))
            .analyze_codebase(&files, &[AnalysisKind::Security])
            .await
            .unwrap();
        assert_eq!(retry_calls.lock().unwrap().len(), 1);
        assert_eq!(agg.security.high.len(), 1);
    }

    #[tokio::test]
    async fn malformed_output_degrades_to_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability {
            security_json: "the model rambled instead of emitting JSON".to_string(),
            ..Default::default()
        };
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let files = vec![rec("app.py", "app.py", "x = 1\n")];
        let agg = analyzer
            .analyze_codebase(&files, &[AnalysisKind::Security])
            .await
            .unwrap();

        assert_eq!(agg.security.total(), 0);
        assert_eq!(agg.analysis_errors.len(), 1);
        assert!(agg.analysis_errors[0].reason.contains("malformed"));
    }

    #[tokio::test]
    async fn architecture_runs_once_over_the_whole_codebase() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability::default();
        let calls = capability.calls.clone();
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let files = vec![
            rec("main.py", "src/main.py", "print(1)\n"),
            rec("util.py", "src/util.py", "print(2)\n"),
        ];
        let agg = analyzer
            .analyze_codebase(&files, &[AnalysisKind::Architecture])
            .await
            .unwrap();

        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, AnalysisKind::Architecture);
        assert!(recorded[0].1.contains("src/main.py"));
        assert!(recorded[0].1.contains("src/util.py"));
        assert_eq!(agg.architecture.issues.len(), 1);
        assert_eq!(agg.architecture.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn architecture_is_skipped_for_an_empty_file_set() {
        let dir = tempfile::tempdir().unwrap();
        let capability = ScriptedCapability::default();
        let calls = capability.calls.clone();
        let analyzer = CodeAnalyzer::new(capability, AnalysisCache::new(dir.path()));

        let agg = analyzer
            .analyze_codebase(&[], &[AnalysisKind::Architecture])
            .await
            .unwrap();

        assert_eq!(calls.lock().unwrap().len(), 0);
        assert!(agg.architecture.issues.is_empty());
        assert_eq!(agg.files_count, 0);
    }

    #[tokio::test]
    async fn score_folds_bucket_deductions() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = CodeAnalyzer::new(
            ScriptedCapability::default(),
            AnalysisCache::new(dir.path()),
        );

        let files = vec![rec("app.py", "app.py", "x = 1\n")];
        let agg = analyzer
            .analyze_codebase(
                &files,
                &[
                    AnalysisKind::Security,
                    AnalysisKind::Performance,
                    AnalysisKind::Style,
                ],
            )
            .await
            .unwrap();

        // security high (10) + performance high (5) + style low (1).
        assert_eq!(agg.overall_score, 84);
    }
}
