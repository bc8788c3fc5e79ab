//! 成绩导入服务
//!
//! CSV 表头 `student_id,task_id,score[,comment]`（不区分大小写）。
//! 分数为空、`-`、`—`、`ungraded` 或 `Not graded` 时清除成绩。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use tracing::{error, info, warn};

use super::GradeService;
use crate::config::AppConfig;
use crate::grading::DIAGNOSTICS_TARGET;
use crate::models::gradebook::entities::{UNGRADED_SENTINEL, UNGRADED_TEXT};
use crate::models::grades::requests::UpsertGradeRequest;
use crate::models::grades::responses::{GradeImportResponse, ImportRowError};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response, require_manager};
use crate::utils::validate::validate_score;

/// 导入解析错误（整个文件）
#[derive(Debug)]
pub(crate) enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
    TooManyRows(usize),
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile | Self::TooManyRows(_) => ErrorCode::ImportFileDataInvalid,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("缺少必需列: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "文件中没有数据行".to_string(),
            Self::TooManyRows(max) => format!("单次导入最多支持 {max} 行"),
        }
    }
}

/// 解析成功的一行
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportRow {
    pub row_num: usize,
    pub student_id: i64,
    pub task_id: i64,
    pub score: Option<f64>,
    pub comment: Option<String>,
}

/// 文件解析结果：合法行与逐行错误
#[derive(Debug, Default)]
pub(crate) struct ParsedImport {
    pub total: usize,
    pub rows: Vec<ImportRow>,
    pub errors: Vec<ImportRowError>,
}

/// 导入成绩
pub async fn import_grades(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    let file_bytes = match read_file_from_multipart(&mut payload).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("文件读取失败: {e}"),
            )));
        }
    };

    let max_rows = AppConfig::get().server.limits.max_import_rows;
    let parsed = match parse_csv(&file_bytes, max_rows) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    let storage = service.get_storage(request)?;

    let roster: HashSet<i64> = match storage.list_class_students(class_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(error_response(&e)),
    };
    let tasks: HashSet<i64> = match storage.list_tasks(class_id, None).await {
        Ok(tasks) => tasks.into_iter().map(|t| t.id).collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    let ParsedImport {
        total,
        rows,
        mut errors,
    } = parsed;
    let mut failed = errors.len();
    let (to_save, skipped_errors) = partition_rows(rows, &roster, &tasks);
    let skipped = skipped_errors.len();
    errors.extend(skipped_errors);

    let mut success = 0;
    for row in to_save {
        let req = UpsertGradeRequest {
            student_id: row.student_id,
            task_id: row.task_id,
            score: row.score,
            comment: row.comment,
        };
        match storage.upsert_grade(class_id, access.user_id, req).await {
            Ok(_) => success += 1,
            Err(e) => {
                failed += 1;
                error!("导入成绩失败: {}", e);
                errors.push(ImportRowError {
                    row: row.row_num,
                    field: String::new(),
                    message: format!("保存失败: {e}"),
                });
            }
        }
    }

    errors.sort_by_key(|e| e.row);
    info!(
        "Grade import for class {} by user {}: total {}, success {}, skipped {}, failed {}",
        class_id, access.user_id, total, success, skipped, failed
    );

    let response = GradeImportResponse {
        total,
        success,
        skipped,
        failed,
        errors,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "导入完成")))
}

async fn read_file_from_multipart(payload: &mut Multipart) -> Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("读取字段失败: {e}"))?;

        if field.name() == Some("file") {
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("读取数据失败: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("未找到文件字段".to_string());
    }

    Ok(file_bytes)
}

/// 是否为“清除成绩”的标记
fn is_ungraded_marker(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value == "-"
        || value == "—"
        || value.eq_ignore_ascii_case(UNGRADED_SENTINEL)
        || value.eq_ignore_ascii_case(UNGRADED_TEXT)
}

fn row_error(row: usize, field: &str, message: impl Into<String>) -> ImportRowError {
    ImportRowError {
        row,
        field: field.to_string(),
        message: message.into(),
    }
}

pub(crate) fn parse_csv(data: &[u8], max_rows: usize) -> Result<ParsedImport, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    // 检查表头
    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("读取表头失败: {e}")))?;
    let header_names: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_lowercase())
        .collect();
    let header_map: HashMap<String, usize> = header_names
        .iter()
        .enumerate()
        .map(|(i, h)| (h.clone(), i))
        .collect();

    let column = |name: &str| {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| ImportParseError::MissingColumn(name.to_string()))
    };
    let student_idx = column("student_id")?;
    let task_idx = column("task_id")?;
    let score_idx = column("score")?;
    let comment_idx = header_map.get("comment").copied();

    let mut parsed = ParsedImport::default();

    // 按字节读取，单行编码错误只影响该行
    for (i, result) in rdr.byte_records().enumerate() {
        let row_num = i + 2; // 1-based, skip header
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("第 {row_num} 行解析失败: {e}"))
        })?;

        // 跳过空行
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        parsed.total += 1;
        if parsed.total > max_rows {
            return Err(ImportParseError::TooManyRows(max_rows));
        }

        let record = match csv::StringRecord::from_byte_record(record) {
            Ok(record) => record,
            Err(e) => {
                let field = header_names
                    .get(e.utf8_error().field())
                    .map(String::as_str)
                    .unwrap_or("row");
                parsed
                    .errors
                    .push(row_error(row_num, field, "内容不是有效的 UTF-8 编码"));
                continue;
            }
        };

        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let student_id = match cell(student_idx).parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                parsed.errors.push(row_error(
                    row_num,
                    "student_id",
                    format!("无效的学生 ID: {}", cell(student_idx)),
                ));
                continue;
            }
        };

        let task_id = match cell(task_idx).parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                parsed.errors.push(row_error(
                    row_num,
                    "task_id",
                    format!("无效的任务 ID: {}", cell(task_idx)),
                ));
                continue;
            }
        };

        let raw_score = cell(score_idx);
        let score = if is_ungraded_marker(raw_score) {
            None
        } else {
            match raw_score.parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    parsed.errors.push(row_error(
                        row_num,
                        "score",
                        format!("无效的分数: {raw_score}"),
                    ));
                    continue;
                }
            }
        };
        if let Err(e) = validate_score(score) {
            parsed
                .errors
                .push(row_error(row_num, "score", e.message().to_string()));
            continue;
        }

        let comment = comment_idx
            .map(cell)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        parsed.rows.push(ImportRow {
            row_num,
            student_id,
            task_id,
            score,
            comment,
        });
    }

    if parsed.total == 0 {
        return Err(ImportParseError::EmptyFile);
    }

    Ok(parsed)
}

/// 拆分可保存的行与需要跳过的行（未知任务、非班级学生）
pub(crate) fn partition_rows(
    rows: Vec<ImportRow>,
    roster: &HashSet<i64>,
    tasks: &HashSet<i64>,
) -> (Vec<ImportRow>, Vec<ImportRowError>) {
    let mut to_save = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        if !tasks.contains(&row.task_id) {
            warn!(
                target: DIAGNOSTICS_TARGET,
                "导入第 {} 行引用的任务 {} 不存在", row.row_num, row.task_id
            );
            skipped.push(row_error(
                row.row_num,
                "task_id",
                format!("Orphan grade reference: task {} does not exist", row.task_id),
            ));
        } else if !roster.contains(&row.student_id) {
            skipped.push(row_error(
                row.row_num,
                "student_id",
                format!("学生 {} 不在本班级", row.student_id),
            ));
        } else {
            to_save.push(row);
        }
    }

    (to_save, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let data = b"Student_ID,Task_ID,Score,Comment\n1,10,18.5,good\n2,10,,\n3,10,ungraded,\n";
        let parsed = parse_csv(data, 5000).unwrap();
        assert_eq!(parsed.total, 3);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows[0].score, Some(18.5));
        assert_eq!(parsed.rows[0].comment.as_deref(), Some("good"));
        assert_eq!(parsed.rows[1].score, None);
        assert_eq!(parsed.rows[2].score, None);
        assert_eq!(parsed.rows[2].row_num, 4);
    }

    #[test]
    fn test_parse_csv_clear_markers() {
        for marker in ["-", "—", "Not graded", "UNGRADED"] {
            let data = format!("student_id,task_id,score\n1,10,{marker}\n");
            let parsed = parse_csv(data.as_bytes(), 5000).unwrap();
            assert_eq!(parsed.rows[0].score, None, "marker {marker}");
        }
    }

    #[test]
    fn test_parse_csv_row_errors() {
        let data = b"student_id,task_id,score\nabc,10,5\n1,x,5\n1,10,-3\n1,10,ten\n1,11,7\n";
        let parsed = parse_csv(data, 5000).unwrap();
        assert_eq!(parsed.total, 5);
        assert_eq!(parsed.rows.len(), 1);
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["student_id", "task_id", "score", "score"]);
        assert_eq!(parsed.errors[0].row, 2);
    }

    #[test]
    fn test_parse_csv_invalid_utf8_is_row_error() {
        let data = b"student_id,task_id,score,comment\n1,10,5,\xff\xfe\n2,10,6,ok\n";
        let parsed = parse_csv(data, 5000).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].student_id, 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert_eq!(parsed.errors[0].field, "comment");
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"student_id,score\n1,5\n", 5000).unwrap_err();
        assert!(matches!(err, ImportParseError::MissingColumn(ref c) if c == "task_id"));
    }

    #[test]
    fn test_parse_csv_limits() {
        assert!(matches!(
            parse_csv(b"student_id,task_id,score\n", 5000).unwrap_err(),
            ImportParseError::EmptyFile
        ));
        let data = b"student_id,task_id,score\n1,1,1\n2,1,1\n3,1,1\n";
        assert!(matches!(
            parse_csv(data, 2).unwrap_err(),
            ImportParseError::TooManyRows(2)
        ));
    }

    #[test]
    fn test_partition_rows() {
        let row = |row_num, student_id, task_id| ImportRow {
            row_num,
            student_id,
            task_id,
            score: Some(1.0),
            comment: None,
        };
        let roster: HashSet<i64> = [1, 2].into_iter().collect();
        let tasks: HashSet<i64> = [10].into_iter().collect();

        let (save, skipped) =
            partition_rows(vec![row(2, 1, 10), row(3, 1, 99), row(4, 7, 10)], &roster, &tasks);
        assert_eq!(save.len(), 1);
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].field, "task_id");
        assert!(skipped[0].message.contains("Orphan"));
        assert_eq!(skipped[1].field, "student_id");
    }
}
