//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, IntoCondition, OnConflict, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, Value,
};
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, PostStatus, Tag};
use scribe_core::error::RepoError;
use scribe_core::ports::{CommentRepository, PostRepository, TagRepository};
use scribe_core::query::{PostQuery, PublishOrder};
use scribe_core::ranking::CommentedPost;

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Translate a `PostQuery` filter into a single SQL condition.
fn published_condition(query: &PostQuery) -> Condition {
    let now: DateTimeWithTimeZone = query.now().into();
    let mut cond = Condition::all()
        .add(post::Column::Status.eq(PostStatus::Published.code()))
        .add(post::Column::Publish.lte(now));

    if let Some(id) = query.id {
        cond = cond.add(post::Column::Id.eq(id));
    }
    if let Some(id) = query.exclude_id {
        cond = cond.add(post::Column::Id.ne(id));
    }
    if let Some(slug) = &query.slug {
        cond = cond.add(post::Column::Slug.eq(slug.as_str()));
    }
    if let Some(date) = query.published_on {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
        let end = start + Duration::days(1);
        cond = cond
            .add(post::Column::Publish.gte(DateTimeWithTimeZone::from(start)))
            .add(post::Column::Publish.lt(DateTimeWithTimeZone::from(end)));
    }
    if let Some(tag_id) = query.tag_id {
        cond = cond.add(post::Column::Id.in_subquery(posts_tagged_with(tag_id)));
    }

    cond
}

/// `SELECT post_id FROM post_tags WHERE tag_id = $1`
fn posts_tagged_with(tag_id: Uuid) -> SelectStatement {
    Query::select()
        .column(post_tag::Column::PostId)
        .from(PostTagEntity)
        .and_where(post_tag::Column::TagId.eq(tag_id))
        .to_owned()
}

impl PostgresPostRepository {
    /// Load posts by id, keeping the order of `ranked`.
    async fn in_rank_order<S>(&self, ranked: Vec<(Uuid, S)>) -> Result<Vec<(Post, S)>, RepoError> {
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ranked.iter().map(|(id, _)| *id).collect();
        let mut posts: HashMap<Uuid, Post> = PostEntity::find()
            .filter(post::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(|model| (model.id, Post::from(model)))
            .collect();

        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| Some((posts.remove(&id)?, score)))
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find().filter(published_condition(query));
        let order = match query.order {
            PublishOrder::NewestFirst => Order::Desc,
            PublishOrder::OldestFirst => Order::Asc,
        };
        select = select
            .order_by(post::Column::Publish, order.clone())
            .order_by(post::Column::Id, order);
        if query.offset > 0 {
            select = select.offset(query.offset);
        }
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let result = select.all(&self.db).await.map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(published_condition(query))
            .count(&self.db)
            .await
            .map_err(repo_err)
    }

    async fn title_similarity(
        &self,
        query: &PostQuery,
        text: &str,
        min_score: f32,
    ) -> Result<Vec<(Post, f32)>, RepoError> {
        // pg_trgm's similarity(); the extension is created by the migration.
        let scores: Vec<(Uuid, f32)> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(
                Expr::cust_with_values("similarity(title, $1)", [text]),
                "score",
            )
            .filter(published_condition(query))
            .filter(Expr::cust_with_values(
                "similarity(title, $1) > $2",
                [Value::from(text), Value::from(min_score)],
            ))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        self.in_rank_order(scores).await
    }

    async fn find_similar(
        &self,
        query: &PostQuery,
        tag_ids: &[Uuid],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let shared = Expr::col((PostTagEntity, post_tag::Column::TagId)).count();
        let ranked: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(shared.clone(), "shared")
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(published_condition(query))
            .filter(post_tag::Column::TagId.is_in(tag_ids.to_vec()))
            .group_by(post::Column::Id)
            .order_by(shared, Order::Desc)
            .order_by_desc(post::Column::Publish)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(self
            .in_rank_order(ranked)
            .await?
            .into_iter()
            .map(|(post, _)| post)
            .collect())
    }

    async fn most_commented(
        &self,
        query: &PostQuery,
        limit: u64,
    ) -> Result<Vec<CommentedPost>, RepoError> {
        let active_comments = post::Relation::Comment.def().on_condition(|_posts, comments| {
            Expr::col((comments, comment::Column::Active))
                .eq(true)
                .into_condition()
        });
        let total = Expr::col((CommentEntity, comment::Column::Id)).count();

        let ranked: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(total.clone(), "total")
            .join(JoinType::LeftJoin, active_comments)
            .filter(published_condition(query))
            .group_by(post::Column::Id)
            .order_by(total, Order::Desc)
            .order_by_asc(post::Column::Publish)
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(self
            .in_rank_order(ranked)
            .await?
            .into_iter()
            .map(|(post, total)| CommentedPost {
                post,
                comments: total.max(0) as u64,
            })
            .collect())
    }

    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<(), RepoError> {
        tracing::debug!(post_id = %id, status = status.code(), "Changing post status");

        let result = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(status.code()))
            .col_expr(
                post::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let tag_ids: HashSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<Uuid, Tag> = TagEntity::find()
            .filter(tag::Column::Id.is_in(tag_ids.into_iter().collect::<Vec<_>>()))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(|model| (model.id, Tag::from(model)))
            .collect();

        let mut by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                by_post.entry(link.post_id).or_default().push(tag.clone());
            }
        }
        for tags in by_post.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(by_post)
    }

    async fn attach(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(*tag_id),
        });

        PostTagEntity::insert_many(links)
            .on_conflict(
                OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), RepoError> {
        tracing::debug!(comment_id = %id, active, "Changing comment visibility");

        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Active, Expr::value(active))
            .col_expr(
                comment::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
