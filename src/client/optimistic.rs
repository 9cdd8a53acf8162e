use crate::models::{Todo, UpdateTodo};

use super::{ClientError, TodoClient};

/// Local copy of a todo list. Mutations show up immediately and are undone
/// if the server rejects them.
#[derive(Debug, Clone, Default)]
pub struct OptimisticList {
    todos: Vec<Todo>,
}

impl OptimisticList {
    pub fn new(todos: Vec<Todo>) -> Self {
        OptimisticList { todos }
    }

    pub async fn load(client: &TodoClient) -> Result<Self, ClientError> {
        Ok(OptimisticList::new(client.list().await?))
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub async fn add(
        &mut self,
        client: &TodoClient,
        title: &str,
        description: Option<&str>,
    ) -> Result<&Todo, ClientError> {
        let todo = client.create(title, description).await?;
        self.todos.push(todo);
        let last = self.todos.len() - 1;
        Ok(&self.todos[last])
    }

    pub async fn toggle(&mut self, client: &TodoClient, id: i64) -> Result<(), ClientError> {
        let idx = self.position(id)?;
        let completed = !self.todos[idx].completed;
        self.todos[idx].completed = completed;

        let changes = UpdateTodo {
            completed: Some(Some(completed)),
            ..UpdateTodo::default()
        };
        match client.update(id, changes).await {
            Ok(todo) => {
                self.todos[idx] = todo;
                Ok(())
            }
            Err(err) => {
                self.todos[idx].completed = !completed;
                Err(err)
            }
        }
    }

    pub async fn rename(
        &mut self,
        client: &TodoClient,
        id: i64,
        title: &str,
    ) -> Result<(), ClientError> {
        let idx = self.position(id)?;
        let previous = std::mem::replace(&mut self.todos[idx].title, title.trim().to_string());

        let changes = UpdateTodo {
            title: Some(Some(title.to_string())),
            ..UpdateTodo::default()
        };
        match client.update(id, changes).await {
            Ok(todo) => {
                self.todos[idx] = todo;
                Ok(())
            }
            Err(err) => {
                self.todos[idx].title = previous;
                Err(err)
            }
        }
    }

    pub async fn remove(&mut self, client: &TodoClient, id: i64) -> Result<(), ClientError> {
        let idx = self.position(id)?;
        let removed = self.todos.remove(idx);

        if let Err(err) = client.delete(id).await {
            self.todos.insert(idx, removed);
            return Err(err);
        }
        Ok(())
    }

    fn position(&self, id: i64) -> Result<usize, ClientError> {
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(ClientError::UnknownTodo(id))
    }
}
