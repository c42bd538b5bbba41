//! Board service for chanboard.
//!
//! High-level board and thread operations. Every operation consults the
//! access policy before touching the store.

use tracing::{debug, info};

use crate::auth::permission::{can_modify_resource, check_permission, Operation};
use crate::db::{Account, Database};
use crate::media::{MediaStorage, Upload, UploadCategory};
use crate::{ChanError, Result};

use super::repository::BoardRepository;
use super::thread::{validate_content, validate_title, NewThread, Thread, VoteDirection};
use super::thread_repository::ThreadRepository;
use super::types::{validate_board_code, validate_board_title, Board, BoardUpdate, NewBoard};

fn caller_of(account: Option<&Account>) -> Result<&Account> {
    account.ok_or_else(|| ChanError::Auth("authentication required".to_string()))
}

/// Service for board and thread operations with permission checking.
pub struct BoardService<'a> {
    db: &'a Database,
    storage: Option<&'a MediaStorage>,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db, storage: None }
    }

    /// Attach media storage, needed for thread images.
    pub fn with_storage(mut self, storage: &'a MediaStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    fn storage(&self) -> Result<&'a MediaStorage> {
        self.storage
            .ok_or_else(|| ChanError::Config("media storage is not configured".to_string()))
    }

    // ------------------------------------------------------------------
    // Boards
    // ------------------------------------------------------------------

    /// List all boards.
    pub async fn list_boards(&self, caller: Option<&Account>) -> Result<Vec<Board>> {
        check_permission(caller, Operation::ListBoards)?;
        BoardRepository::new(self.db.pool()).list().await
    }

    /// Get a board by ID.
    pub async fn get_board(&self, caller: Option<&Account>, board_id: i64) -> Result<Board> {
        check_permission(caller, Operation::RetrieveBoard)?;
        self.find_board(board_id).await
    }

    /// Create a board owned by the calling admin.
    pub async fn create_board(
        &self,
        caller: Option<&Account>,
        title: &str,
        code: &str,
    ) -> Result<Board> {
        check_permission(caller, Operation::CreateBoard)?;
        let admin = caller_of(caller)?;

        let title = title.trim();
        let code = code.trim();
        validate_board_title(title)?;
        validate_board_code(code)?;

        let repo = BoardRepository::new(self.db.pool());
        if repo.title_exists(title, None).await? {
            return Err(ChanError::Validation(
                "a board with this title already exists".to_string(),
            ));
        }
        if repo.code_exists(code, None).await? {
            return Err(ChanError::Validation(
                "a board with this code already exists".to_string(),
            ));
        }

        let board = repo.create(&NewBoard::new(title, code, admin.id)).await?;
        info!(board_id = board.id, code = %board.code, admin_id = admin.id, "Board created");
        Ok(board)
    }

    /// Update a board's title and/or code.
    pub async fn update_board(
        &self,
        caller: Option<&Account>,
        board_id: i64,
        update: BoardUpdate,
    ) -> Result<Board> {
        check_permission(caller, Operation::UpdateBoard)?;
        let repo = BoardRepository::new(self.db.pool());
        self.find_board(board_id).await?;

        let mut normalized = BoardUpdate::new();
        if let Some(title) = update.title.as_deref().map(str::trim) {
            validate_board_title(title)?;
            if repo.title_exists(title, Some(board_id)).await? {
                return Err(ChanError::Validation(
                    "a board with this title already exists".to_string(),
                ));
            }
            normalized = normalized.title(title);
        }
        if let Some(code) = update.code.as_deref().map(str::trim) {
            validate_board_code(code)?;
            if repo.code_exists(code, Some(board_id)).await? {
                return Err(ChanError::Validation(
                    "a board with this code already exists".to_string(),
                ));
            }
            normalized = normalized.code(code);
        }

        let board = repo
            .update(board_id, &normalized)
            .await?
            .ok_or_else(|| ChanError::NotFound("board".to_string()))?;
        info!(board_id = board.id, "Board updated");
        Ok(board)
    }

    /// Delete a board and every thread in it.
    ///
    /// Thread images are removed from storage when storage is attached.
    pub async fn delete_board(&self, caller: Option<&Account>, board_id: i64) -> Result<()> {
        check_permission(caller, Operation::DeleteBoard)?;
        self.find_board(board_id).await?;

        let images: Vec<String> = ThreadRepository::new(self.db.pool())
            .list_by_board(board_id)
            .await?
            .into_iter()
            .filter_map(|t| t.image)
            .collect();

        if !BoardRepository::new(self.db.pool()).delete(board_id).await? {
            return Err(ChanError::NotFound("board".to_string()));
        }

        if let Some(storage) = self.storage {
            for key in &images {
                storage.discard(key).await;
            }
        }

        info!(board_id = board_id, thread_images = images.len(), "Board deleted");
        Ok(())
    }

    async fn find_board(&self, board_id: i64) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| ChanError::NotFound("board".to_string()))
    }

    // ------------------------------------------------------------------
    // Threads
    // ------------------------------------------------------------------

    /// List the threads of a board.
    pub async fn list_threads(&self, caller: Option<&Account>, board_id: i64) -> Result<Vec<Thread>> {
        check_permission(caller, Operation::ListThreads)?;
        self.find_board(board_id).await?;
        ThreadRepository::new(self.db.pool())
            .list_by_board(board_id)
            .await
    }

    /// Get a thread by ID.
    pub async fn get_thread(&self, caller: Option<&Account>, thread_id: i64) -> Result<Thread> {
        check_permission(caller, Operation::ViewThread)?;
        self.find_thread(thread_id).await
    }

    /// Create a thread in a board, optionally with an image.
    pub async fn create_thread(
        &self,
        caller: Option<&Account>,
        board_id: i64,
        title: &str,
        content: &str,
        image: Option<Upload<'_>>,
    ) -> Result<Thread> {
        check_permission(caller, Operation::CreateThread)?;
        let author = caller_of(caller)?;

        let title = title.trim();
        validate_title(title)?;
        validate_content(content)?;
        self.find_board(board_id).await?;

        let mut new_thread = NewThread::new(board_id, author.id, title, content);
        let stored = match image {
            Some(upload) => {
                let key = self
                    .storage()?
                    .save_image(UploadCategory::Thread, upload.file_name, upload.content)
                    .await?;
                new_thread = new_thread.with_image(&key);
                Some(key)
            }
            None => None,
        };

        let thread = match ThreadRepository::new(self.db.pool()).create(&new_thread).await {
            Ok(thread) => thread,
            Err(e) => {
                if let (Some(key), Some(storage)) = (stored, self.storage) {
                    storage.discard(&key).await;
                }
                return Err(e);
            }
        };

        info!(
            thread_id = thread.id,
            board_id = board_id,
            author_id = author.id,
            "Thread created"
        );
        Ok(thread)
    }

    /// Attach or replace a thread's image. Only the author or an admin may.
    pub async fn set_thread_image(
        &self,
        caller: Option<&Account>,
        thread_id: i64,
        upload: Upload<'_>,
    ) -> Result<Thread> {
        check_permission(caller, Operation::AttachThreadImage)?;
        let account = caller_of(caller)?;
        let thread = self.find_thread(thread_id).await?;

        if !can_modify_resource(account, thread.author_id) {
            return Err(ChanError::Permission(
                "only the author may change this thread".to_string(),
            ));
        }

        let storage = self.storage()?;
        let key = storage
            .save_image(UploadCategory::Thread, upload.file_name, upload.content)
            .await?;

        let updated = match ThreadRepository::new(self.db.pool())
            .set_image(thread_id, &key)
            .await
        {
            Ok(Some(t)) => t,
            Ok(None) => {
                storage.discard(&key).await;
                return Err(ChanError::NotFound("thread".to_string()));
            }
            Err(e) => {
                storage.discard(&key).await;
                return Err(e);
            }
        };

        if let Some(previous) = thread.image {
            storage.discard(&previous).await;
        }

        info!(thread_id = thread_id, image = %key, "Thread image set");
        Ok(updated)
    }

    /// Vote on a thread.
    ///
    /// The caller ends up in exactly the `direction` set.
    pub async fn vote(
        &self,
        caller: Option<&Account>,
        thread_id: i64,
        direction: VoteDirection,
    ) -> Result<Thread> {
        check_permission(caller, Operation::Vote)?;
        let account = caller_of(caller)?;
        self.find_thread(thread_id).await?;

        ThreadRepository::new(self.db.pool())
            .vote(thread_id, account.id, direction)
            .await?;

        debug!(
            thread_id = thread_id,
            account_id = account.id,
            direction = %direction,
            "Vote recorded"
        );
        self.find_thread(thread_id).await
    }

    /// Remove the caller's vote from a thread.
    pub async fn clear_vote(&self, caller: Option<&Account>, thread_id: i64) -> Result<Thread> {
        check_permission(caller, Operation::Vote)?;
        let account = caller_of(caller)?;
        self.find_thread(thread_id).await?;

        ThreadRepository::new(self.db.pool())
            .clear_vote(thread_id, account.id)
            .await?;
        self.find_thread(thread_id).await
    }

    /// The caller's current vote on a thread.
    pub async fn vote_of(
        &self,
        caller: Option<&Account>,
        thread_id: i64,
    ) -> Result<Option<VoteDirection>> {
        match caller {
            Some(account) => {
                ThreadRepository::new(self.db.pool())
                    .vote_of(thread_id, account.id)
                    .await
            }
            None => Ok(None),
        }
    }

    async fn find_thread(&self, thread_id: i64) -> Result<Thread> {
        ThreadRepository::new(self.db.pool())
            .get_by_id(thread_id)
            .await?
            .ok_or_else(|| ChanError::NotFound("thread".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AccountRepository, NewAccount};
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        admin: Account,
        user: Account,
        other: Account,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let repo = AccountRepository::new(db.pool());
        let admin = repo
            .create(&NewAccount::new("admin@example.com", "admin", "hash").as_admin())
            .await
            .unwrap();
        let user = repo
            .create(&NewAccount::new("user@example.com", "user", "hash"))
            .await
            .unwrap();
        let other = repo
            .create(&NewAccount::new("other@example.com", "other", "hash"))
            .await
            .unwrap();
        Fixture {
            db,
            admin,
            user,
            other,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_and_retrieves_board() {
        let f = setup().await;
        let service = BoardService::new(&f.db);

        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        assert_eq!(board.creator_id, f.admin.id);

        let fetched = service.get_board(Some(&f.admin), board.id).await.unwrap();
        assert_eq!(fetched.title, "Test Board");
        assert_eq!(fetched.code, "tb");
    }

    #[tokio::test]
    async fn test_non_admin_cannot_manage_boards() {
        let f = setup().await;
        let service = BoardService::new(&f.db);

        let result = service.create_board(Some(&f.user), "Test Board", "tb").await;
        assert!(matches!(result, Err(ChanError::Permission(_))));

        let result = service.create_board(None, "Test Board", "tb").await;
        assert!(matches!(result, Err(ChanError::Auth(_))));

        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        assert!(matches!(
            service.get_board(Some(&f.user), board.id).await,
            Err(ChanError::Permission(_))
        ));
        assert!(matches!(
            service.delete_board(Some(&f.user), board.id).await,
            Err(ChanError::Permission(_))
        ));
    }

    #[tokio::test]
    async fn test_anyone_lists_boards() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        service
            .create_board(Some(&f.admin), "political", "pl")
            .await
            .unwrap();

        assert_eq!(service.list_boards(None).await.unwrap().len(), 2);
        assert_eq!(service.list_boards(Some(&f.user)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_board_validation_and_uniqueness() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let admin = Some(&f.admin);

        assert!(matches!(
            service.create_board(admin, "", "tb").await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.create_board(admin, "Title", "").await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.create_board(admin, "Title", "toolong").await,
            Err(ChanError::Validation(_))
        ));

        service.create_board(admin, "Test Board", "tb").await.unwrap();
        assert!(matches!(
            service.create_board(admin, "Test Board", "xx").await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.create_board(admin, "Another", "tb").await,
            Err(ChanError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_board() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let admin = Some(&f.admin);
        let board = service.create_board(admin, "Test Board", "tb").await.unwrap();
        service.create_board(admin, "Taken", "tk").await.unwrap();

        let updated = service
            .update_board(admin, board.id, BoardUpdate::new().title("new board").code("nb"))
            .await
            .unwrap();
        assert_eq!(updated.title, "new board");
        assert_eq!(updated.code, "nb");

        // keeping the same code is not a conflict
        assert!(service
            .update_board(admin, board.id, BoardUpdate::new().code("nb"))
            .await
            .is_ok());

        assert!(matches!(
            service
                .update_board(admin, board.id, BoardUpdate::new().code("tk"))
                .await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.update_board(admin, 999, BoardUpdate::new()).await,
            Err(ChanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_board_removes_threads() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        let thread = service
            .create_thread(Some(&f.user), board.id, "Hello", "World", None)
            .await
            .unwrap();

        service.delete_board(Some(&f.admin), board.id).await.unwrap();

        assert!(matches!(
            service.get_thread(None, thread.id).await,
            Err(ChanError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_board(Some(&f.admin), board.id).await,
            Err(ChanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_thread() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();

        let thread = service
            .create_thread(Some(&f.user), board.id, "  Hello  ", "World", None)
            .await
            .unwrap();
        assert_eq!(thread.title, "Hello");
        assert_eq!(thread.author_id, f.user.id);

        let threads = service.list_threads(None, board.id).await.unwrap();
        assert_eq!(threads.len(), 1);
    }

    #[tokio::test]
    async fn test_create_thread_failures() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();

        assert!(matches!(
            service.create_thread(Some(&f.user), 999, "t", "c", None).await,
            Err(ChanError::NotFound(_))
        ));
        assert!(matches!(
            service.create_thread(None, board.id, "t", "c", None).await,
            Err(ChanError::Auth(_))
        ));
        assert!(matches!(
            service.create_thread(Some(&f.user), board.id, "", "c", None).await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.create_thread(Some(&f.user), board.id, "t", " ", None).await,
            Err(ChanError::Validation(_))
        ));
        assert!(matches!(
            service.list_threads(None, 999).await,
            Err(ChanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_thread_with_image() {
        let f = setup().await;
        let dir = TempDir::new().unwrap();
        let storage = MediaStorage::new(dir.path(), 1024).unwrap();
        let service = BoardService::new(&f.db).with_storage(&storage);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();

        let thread = service
            .create_thread(
                Some(&f.user),
                board.id,
                "Pic",
                "Look",
                Some(Upload::new("cat.jpg", b"jpegdata")),
            )
            .await
            .unwrap();

        let key = thread.image.unwrap();
        assert!(key.starts_with("uploads/thread/"));
        assert!(key.ends_with(".jpg"));
        assert!(storage.exists(&key).await);
    }

    #[tokio::test]
    async fn test_create_thread_image_without_storage() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();

        let result = service
            .create_thread(
                Some(&f.user),
                board.id,
                "Pic",
                "Look",
                Some(Upload::new("cat.jpg", b"jpegdata")),
            )
            .await;
        assert!(matches!(result, Err(ChanError::Config(_))));
    }

    #[tokio::test]
    async fn test_set_thread_image_ownership() {
        let f = setup().await;
        let dir = TempDir::new().unwrap();
        let storage = MediaStorage::new(dir.path(), 1024).unwrap();
        let service = BoardService::new(&f.db).with_storage(&storage);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        let thread = service
            .create_thread(Some(&f.user), board.id, "t", "c", None)
            .await
            .unwrap();

        let result = service
            .set_thread_image(Some(&f.other), thread.id, Upload::new("a.png", b"png"))
            .await;
        assert!(matches!(result, Err(ChanError::Permission(_))));

        let first = service
            .set_thread_image(Some(&f.user), thread.id, Upload::new("a.png", b"png"))
            .await
            .unwrap()
            .image
            .unwrap();
        let second = service
            .set_thread_image(Some(&f.admin), thread.id, Upload::new("b.gif", b"gif"))
            .await
            .unwrap()
            .image
            .unwrap();

        assert!(!storage.exists(&first).await);
        assert!(storage.exists(&second).await);
    }

    #[tokio::test]
    async fn test_vote_exclusivity() {
        let f = setup().await;
        let service = BoardService::new(&f.db);
        let board = service
            .create_board(Some(&f.admin), "Test Board", "tb")
            .await
            .unwrap();
        let thread = service
            .create_thread(Some(&f.user), board.id, "t", "c", None)
            .await
            .unwrap();

        let t = service
            .vote(Some(&f.other), thread.id, VoteDirection::Up)
            .await
            .unwrap();
        assert_eq!((t.upvotes, t.downvotes), (1, 0));

        let t = service
            .vote(Some(&f.other), thread.id, VoteDirection::Down)
            .await
            .unwrap();
        assert_eq!((t.upvotes, t.downvotes), (0, 1));
        assert_eq!(
            service.vote_of(Some(&f.other), thread.id).await.unwrap(),
            Some(VoteDirection::Down)
        );

        let t = service.clear_vote(Some(&f.other), thread.id).await.unwrap();
        assert_eq!((t.upvotes, t.downvotes), (0, 0));
        assert_eq!(service.vote_of(None, thread.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vote_requires_account_and_thread() {
        let f = setup().await;
        let service = BoardService::new(&f.db);

        assert!(matches!(
            service.vote(None, 1, VoteDirection::Up).await,
            Err(ChanError::Auth(_))
        ));
        assert!(matches!(
            service.vote(Some(&f.user), 999, VoteDirection::Up).await,
            Err(ChanError::NotFound(_))
        ));
    }
}
