/// SQLite implementation of the storage interfaces
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits, tasks and daily quotes. It handles all SQL queries
/// and row conversion.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::domain::{
    DailyQuote, Habit, HabitId, Priority, QuoteOrigin, Task, TaskId,
};
use crate::storage::{
    migrations, HabitFilter, HabitModifier, HabitStorage, QuoteStorage, StorageError, TaskFilter,
    TaskStorage,
};

const HABIT_COLUMNS: &str = "id, name, description, frequency, custom_interval, category, \
     streak, best_streak, last_completed, created_on, is_active, color, icon";

const TASK_COLUMNS: &str = "id, title, description, category, due_date, due_time, priority, \
     is_completed, completed_on, created_on, tags, estimated_minutes, actual_minutes";

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex: every operation, and in particular the
/// read-modify-write of [`HabitStorage::modify_habit`], runs with exclusive
/// access, which makes this the single writer for every entity it holds.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a throwaway in-memory database (handy for tests and dry runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("database lock poisoned".to_string()))
    }
}

// Row conversion helpers

fn invalid_column(index: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, ty, message.into())
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let frequency: String = row.get(3)?;
    let frequency = frequency
        .parse()
        .map_err(|e: crate::domain::DomainError| invalid_column(3, Type::Text, e.to_string()))?;

    Ok(Habit {
        id: HabitId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        frequency,
        custom_interval: row.get(4)?,
        category: row.get(5)?,
        streak: row.get(6)?,
        best_streak: row.get(7)?,
        last_completed: row.get(8)?,
        created_on: row.get(9)?,
        is_active: row.get(10)?,
        color: row.get(11)?,
        icon: row.get(12)?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let level: u8 = row.get(6)?;
    let priority = Priority::from_level(level)
        .ok_or_else(|| invalid_column(6, Type::Integer, format!("unknown priority level {}", level)))?;

    let tags: String = row.get(10)?;
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: TaskId(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        due_date: row.get(4)?,
        due_time: row.get(5)?,
        priority,
        is_completed: row.get(7)?,
        completed_on: row.get(8)?,
        created_on: row.get(9)?,
        tags,
        estimated_minutes: row.get(11)?,
        actual_minutes: row.get(12)?,
    })
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<DailyQuote> {
    let origin: String = row.get(4)?;
    let origin = match origin.as_str() {
        "remote" => QuoteOrigin::Remote,
        "fallback" => QuoteOrigin::Fallback,
        other => {
            return Err(invalid_column(4, Type::Text, format!("unknown quote origin '{}'", other)))
        }
    };
    let fetched_at: DateTime<Utc> = row.get(3)?;

    Ok(DailyQuote {
        date: row.get(0)?,
        content: row.get(1)?,
        author: row.get(2)?,
        fetched_at,
        origin,
    })
}

fn origin_to_str(origin: QuoteOrigin) -> &'static str {
    match origin {
        QuoteOrigin::Remote => "remote",
        QuoteOrigin::Fallback => "fallback",
    }
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// Load one habit on an already locked connection
fn load_habit(conn: &Connection, habit_id: &HabitId) -> Result<Habit, StorageError> {
    let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
    conn.query_row(&sql, params![habit_id.as_str()], habit_from_row)
        .optional()?
        .ok_or_else(|| StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
}

/// Insert or fully replace one habit on an already locked connection
fn write_habit(conn: &Connection, habit: &Habit, replace: bool) -> Result<(), StorageError> {
    habit.validate_invariants()?;

    let verb = if replace { "INSERT OR REPLACE" } else { "INSERT" };
    let sql = format!(
        "{} INTO habits ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        verb, HABIT_COLUMNS
    );
    conn.execute(
        &sql,
        params![
            habit.id.as_str(),
            habit.name,
            habit.description,
            habit.frequency.as_str(),
            habit.custom_interval,
            habit.category,
            habit.streak,
            habit.best_streak,
            habit.last_completed,
            habit.created_on,
            habit.is_active,
            habit.color,
            habit.icon,
        ],
    )?;
    Ok(())
}

fn write_task(conn: &Connection, task: &Task, replace: bool) -> Result<(), StorageError> {
    task.validate()?;

    let tags = serde_json::to_string(&task.tags)?;
    let verb = if replace { "INSERT OR REPLACE" } else { "INSERT" };
    let sql = format!(
        "{} INTO tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        verb, TASK_COLUMNS
    );
    conn.execute(
        &sql,
        params![
            task.id.as_str(),
            task.title,
            task.description,
            task.category,
            task.due_date,
            task.due_time,
            task.priority.level(),
            task.is_completed,
            task.completed_on,
            task.created_on,
            tags,
            task.estimated_minutes,
            task.actual_minutes,
        ],
    )?;
    Ok(())
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let conn = self.conn()?;
        write_habit(&conn, habit, false)?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.conn()?;
        load_habit(&conn, habit_id)
    }

    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let conn = self.conn()?;
        write_habit(&conn, habit, true)?;

        tracing::debug!("Saved habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let rows_affected = conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits WHERE 1 = 1", HABIT_COLUMNS);
        let mut args: Vec<Value> = Vec::new();

        if filter.active_only {
            sql.push_str(" AND is_active = 1");
        }
        if let Some(ref category) = filter.category {
            sql.push_str(" AND category = ?");
            args.push(Value::Text(category.clone()));
        }
        sql.push_str(" ORDER BY created_on DESC, name ASC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params_from_iter(args), habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn habit_categories(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM habits WHERE is_active = 1 ORDER BY category",
        )?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    fn modify_habit(
        &self,
        habit_id: &HabitId,
        modify: &mut HabitModifier<'_>,
    ) -> Result<Habit, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = load_habit(&tx, habit_id)?;
        let stored = match modify(&current)? {
            Some(updated) => {
                if updated.id != current.id {
                    return Err(StorageError::CorruptRow {
                        table: "habits",
                        message: format!("modifier changed habit id {} to {}", current.id, updated.id),
                    });
                }
                write_habit(&tx, &updated, true)?;
                updated
            }
            None => current,
        };

        tx.commit()?;
        tracing::debug!("Modified habit: {} ({})", stored.name, stored.id);
        Ok(stored)
    }
}

impl TaskStorage for SqliteStorage {
    fn create_task(&self, task: &Task) -> Result<(), StorageError> {
        let conn = self.conn()?;
        write_task(&conn, task, false)?;

        tracing::debug!("Created task: {} ({})", task.title, task.id);
        Ok(())
    }

    fn get_task(&self, task_id: &TaskId) -> Result<Task, StorageError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        conn.query_row(&sql, params![task_id.as_str()], task_from_row)
            .optional()?
            .ok_or_else(|| StorageError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    fn save_task(&self, task: &Task) -> Result<(), StorageError> {
        let conn = self.conn()?;
        write_task(&conn, task, true)?;

        tracing::debug!("Saved task: {} ({})", task.title, task.id);
        Ok(())
    }

    fn delete_task(&self, task_id: &TaskId) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let rows_affected =
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id.as_str()])?;

        if rows_affected == 0 {
            return Err(StorageError::TaskNotFound {
                task_id: task_id.to_string(),
            });
        }

        tracing::debug!("Deleted task: {}", task_id);
        Ok(())
    }

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StorageError> {
        let mut sql = format!("SELECT {} FROM tasks WHERE 1 = 1", TASK_COLUMNS);
        let mut args: Vec<Value> = Vec::new();

        if !filter.include_completed {
            sql.push_str(" AND is_completed = 0");
        }
        if let Some(ref category) = filter.category {
            sql.push_str(" AND category = ?");
            args.push(Value::Text(category.clone()));
        }
        if let Some(priority) = filter.priority {
            sql.push_str(" AND priority = ?");
            args.push(Value::Integer(i64::from(priority.level())));
        }
        if let Some(due_on) = filter.due_on {
            sql.push_str(" AND due_date = ?");
            args.push(date_value(due_on));
        }
        if let Some((from, until)) = filter.touching {
            sql.push_str(" AND ((due_date BETWEEN ? AND ?) OR (completed_on BETWEEN ? AND ?))");
            args.extend([
                date_value(from),
                date_value(until),
                date_value(from),
                date_value(until),
            ]);
        }
        sql.push_str(
            " ORDER BY priority DESC, due_date IS NULL, due_date ASC, created_on ASC, title ASC",
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_from_iter(args), task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    fn task_categories(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT category FROM tasks ORDER BY category")?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(categories)
    }
}

impl QuoteStorage for SqliteStorage {
    fn get_quote(&self, date: NaiveDate) -> Result<Option<DailyQuote>, StorageError> {
        let conn = self.conn()?;
        let quote = conn
            .query_row(
                "SELECT date, content, author, fetched_at, origin FROM daily_quotes WHERE date = ?1",
                params![date],
                quote_from_row,
            )
            .optional()?;

        Ok(quote)
    }

    fn insert_quote(&self, quote: &DailyQuote) -> Result<DailyQuote, StorageError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO daily_quotes (date, content, author, fetched_at, origin)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                quote.date,
                quote.content,
                quote.author,
                quote.fetched_at,
                origin_to_str(quote.origin),
            ],
        )?;

        if inserted == 0 {
            tracing::debug!("Quote for {} already stored, keeping existing record", quote.date);
        }

        let stored = conn.query_row(
            "SELECT date, content, author, fetched_at, origin FROM daily_quotes WHERE date = ?1",
            params![quote.date],
            quote_from_row,
        )?;
        Ok(stored)
    }

    fn delete_quotes_before(&self, cutoff: NaiveDate) -> Result<usize, StorageError> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM daily_quotes WHERE date < ?1", params![cutoff])?;

        tracing::debug!("Deleted {} quotes older than {}", deleted, cutoff);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, HabitChanges};
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(name: &str, category: &str) -> Habit {
        Habit::new(
            name.to_string(),
            String::new(),
            Frequency::Daily,
            0,
            category.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_habit_round_trip_preserves_fields() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut original = habit("Make Fire", "Survival");
        original.streak = 3;
        original.best_streak = 8;
        original.last_completed = Some(date(2024, 2, 29));

        storage.create_habit(&original).unwrap();
        let loaded = storage.get_habit(&original.id).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_habit_is_not_found() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let result = storage.get_habit(&HabitId("nope".to_string()));
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
    }

    #[test]
    fn test_save_habit_upserts() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut fire = habit("Make Fire", "Survival");
        storage.save_habit(&fire).unwrap();

        fire.update(HabitChanges {
            name: Some("Make Big Fire".to_string()),
            ..Default::default()
        })
        .unwrap();
        storage.save_habit(&fire).unwrap();

        let all = storage.list_habits(&HabitFilter::all()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Make Big Fire");
    }

    #[test]
    fn test_save_rejects_broken_invariants() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut broken = habit("Make Fire", "Survival");
        broken.streak = 4;

        let result = storage.save_habit(&broken);
        assert!(matches!(result, Err(StorageError::Domain(_))));
    }

    #[test]
    fn test_list_habits_filters() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let fire = habit("Make Fire", "Survival");
        let hunt = habit("Hunt", "Food");
        let paint = habit("Paint Wall", "Art");
        storage.create_habit(&fire).unwrap();
        storage.create_habit(&hunt).unwrap();
        storage.create_habit(&paint).unwrap();
        storage
            .modify_habit(&paint.id, &mut |current| {
                let mut archived = current.clone();
                archived.deactivate();
                Ok(Some(archived))
            })
            .unwrap();

        assert_eq!(storage.list_habits(&HabitFilter::all()).unwrap().len(), 3);
        assert_eq!(storage.list_habits(&HabitFilter::active()).unwrap().len(), 2);

        let food = storage
            .list_habits(&HabitFilter {
                active_only: true,
                category: Some("Food".to_string()),
            })
            .unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].id, hunt.id);

        assert_eq!(
            storage.habit_categories().unwrap(),
            vec!["Food".to_string(), "Survival".to_string()]
        );
    }

    #[test]
    fn test_modify_habit_persists_only_some() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let fire = habit("Make Fire", "Survival");
        storage.create_habit(&fire).unwrap();

        let unchanged = storage.modify_habit(&fire.id, &mut |_| Ok(None)).unwrap();
        assert_eq!(unchanged, fire);

        let renamed = storage
            .modify_habit(&fire.id, &mut |current| {
                let mut next = current.clone();
                next.name = "Stoke Fire".to_string();
                Ok(Some(next))
            })
            .unwrap();
        assert_eq!(renamed.name, "Stoke Fire");
        assert_eq!(storage.get_habit(&fire.id).unwrap().name, "Stoke Fire");
    }

    #[test]
    fn test_modify_missing_habit_is_not_found() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let result = storage.modify_habit(&HabitId("ghost".to_string()), &mut |_| Ok(None));
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
    }

    #[test]
    fn test_delete_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let fire = habit("Make Fire", "Survival");
        storage.create_habit(&fire).unwrap();

        storage.delete_habit(&fire.id).unwrap();
        assert!(matches!(
            storage.delete_habit(&fire.id),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_tasks_touching_range() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let rock = |title: &str, due: Option<NaiveDate>| {
            Task::new(title.to_string(), String::new(), "Cave".to_string(), Priority::Medium, due, 0)
                .unwrap()
        };

        let inside = rock("Fix roof", Some(date(2024, 6, 10)));
        let outside = rock("Skin hide", Some(date(2024, 7, 2)));
        let mut undated = rock("Sweep cave", None);
        undated.complete(date(2024, 6, 30));
        let mut late = rock("Carve bowl", Some(date(2024, 5, 20)));
        late.complete(date(2024, 6, 1));
        for task in [&inside, &outside, &undated, &late] {
            storage.create_task(task).unwrap();
        }

        let june = storage
            .list_tasks(&TaskFilter {
                include_completed: true,
                touching: Some((date(2024, 6, 1), date(2024, 6, 30))),
                ..Default::default()
            })
            .unwrap();
        let mut titles: Vec<&str> = june.iter().map(|t| t.title.as_str()).collect();
        titles.sort_unstable();

        // both bounds are inclusive
        assert_eq!(titles, vec!["Carve bowl", "Fix roof", "Sweep cave"]);
    }

    #[test]
    fn test_task_round_trip_and_filters() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut spear = Task::new(
            "Sharpen spear".to_string(),
            "Use the good rock".to_string(),
            "Hunting".to_string(),
            Priority::High,
            Some(date(2024, 5, 1)),
            30,
        )
        .unwrap()
        .with_due_time(NaiveTime::from_hms_opt(9, 30, 0))
        .with_tags(vec!["tools".to_string(), "hunt".to_string()]);
        let berries = Task::new(
            "Gather berries".to_string(),
            String::new(),
            "Food".to_string(),
            Priority::Low,
            None,
            0,
        )
        .unwrap();

        storage.create_task(&spear).unwrap();
        storage.create_task(&berries).unwrap();
        assert_eq!(storage.get_task(&spear.id).unwrap(), spear);

        spear.complete(date(2024, 4, 30));
        storage.save_task(&spear).unwrap();

        let open = storage.list_tasks(&TaskFilter::default()).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, berries.id);

        let all = storage
            .list_tasks(&TaskFilter {
                include_completed: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all.len(), 2);

        let high = storage
            .list_tasks(&TaskFilter {
                include_completed: true,
                priority: Some(Priority::High),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].completed_on, Some(date(2024, 4, 30)));

        let due = storage
            .list_tasks(&TaskFilter {
                include_completed: true,
                due_on: Some(date(2024, 5, 1)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(due.len(), 1);

        assert_eq!(
            storage.task_categories().unwrap(),
            vec!["Food".to_string(), "Hunting".to_string()]
        );
    }

    #[test]
    fn test_tasks_sorted_by_priority_then_due_date() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let make = |title: &str, priority, due| {
            Task::new(title.to_string(), String::new(), "Cave".to_string(), priority, due, 0).unwrap()
        };
        let undated = make("Sweep cave", Priority::High, None);
        let later = make("Trade pelts", Priority::High, Some(date(2024, 6, 2)));
        let sooner = make("Fix roof", Priority::High, Some(date(2024, 6, 1)));
        let boulder = make("Move boulder", Priority::Urgent, None);
        let pebble = make("Skip stones", Priority::Low, Some(date(2024, 5, 1)));
        for task in [&undated, &later, &sooner, &boulder, &pebble] {
            storage.create_task(task).unwrap();
        }

        let titles: Vec<String> = storage
            .list_tasks(&TaskFilter::default())
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(
            titles,
            vec!["Move boulder", "Fix roof", "Trade pelts", "Sweep cave", "Skip stones"]
        );
    }

    #[test]
    fn test_missing_task_is_not_found() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let id = TaskId("ghost".to_string());
        assert!(matches!(
            storage.get_task(&id),
            Err(StorageError::TaskNotFound { .. })
        ));
        assert!(matches!(
            storage.delete_task(&id),
            Err(StorageError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_quote_insert_keeps_first_record() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let day = date(2024, 8, 1);
        let first = DailyQuote::fallback(day);
        let second = DailyQuote::remote(day, "Other".to_string(), "Someone".to_string());

        let stored = storage.insert_quote(&first).unwrap();
        assert_eq!(stored.content, first.content);

        let stored_again = storage.insert_quote(&second).unwrap();
        assert_eq!(stored_again.content, first.content);
        assert_eq!(stored_again.origin, QuoteOrigin::Fallback);
    }

    #[test]
    fn test_delete_old_quotes() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.insert_quote(&DailyQuote::fallback(date(2024, 1, 1))).unwrap();
        storage.insert_quote(&DailyQuote::fallback(date(2024, 2, 1))).unwrap();

        let deleted = storage.delete_quotes_before(date(2024, 1, 15)).unwrap();

        assert_eq!(deleted, 1);
        assert!(storage.get_quote(date(2024, 1, 1)).unwrap().is_none());
        assert!(storage.get_quote(date(2024, 2, 1)).unwrap().is_some());
    }
}
