//! The relationship graph between the four entity types, declared once as
//! plain data. Read queries in `db_helpers` resolve these declarations into
//! join clauses instead of inlining join keys at every call site, so a
//! traversal that was never declared fails at query construction.

use crate::errors::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Post,
    Comment,
    Vote,
}

impl Entity {
    pub fn table(self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Post => "post",
            Entity::Comment => "comment",
            Entity::Vote => "vote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// One source row owns many target rows; the foreign key lives on the target.
    HasMany,
    /// The source row holds the foreign key pointing at one target row.
    BelongsTo,
    /// Source and target are related through a join table; the foreign key
    /// is the join-table column pointing back at the source.
    BelongsToMany,
}

#[derive(Debug, Clone, Copy)]
pub struct Association {
    pub kind: AssociationKind,
    pub source: Entity,
    pub target: Entity,
    pub foreign_key: &'static str,
    pub through: Option<Entity>,
    pub alias: Option<&'static str>,
}

/// Every declared traversal. The two `voted_posts` declarations describe the
/// same underlying `vote` table as the Vote has-many/belongs-to pairs; both
/// directions must name it as their `through` entity so the join semantics
/// cannot diverge.
pub const ASSOCIATIONS: &[Association] = &[
    Association {
        kind: AssociationKind::HasMany,
        source: Entity::User,
        target: Entity::Post,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsTo,
        source: Entity::Post,
        target: Entity::User,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::HasMany,
        source: Entity::User,
        target: Entity::Comment,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::HasMany,
        source: Entity::Post,
        target: Entity::Comment,
        foreign_key: "post_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsTo,
        source: Entity::Comment,
        target: Entity::User,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsTo,
        source: Entity::Comment,
        target: Entity::Post,
        foreign_key: "post_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::HasMany,
        source: Entity::User,
        target: Entity::Vote,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::HasMany,
        source: Entity::Post,
        target: Entity::Vote,
        foreign_key: "post_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsTo,
        source: Entity::Vote,
        target: Entity::User,
        foreign_key: "user_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsTo,
        source: Entity::Vote,
        target: Entity::Post,
        foreign_key: "post_id",
        through: None,
        alias: None,
    },
    Association {
        kind: AssociationKind::BelongsToMany,
        source: Entity::User,
        target: Entity::Post,
        foreign_key: "user_id",
        through: Some(Entity::Vote),
        alias: Some("voted_posts"),
    },
    Association {
        kind: AssociationKind::BelongsToMany,
        source: Entity::Post,
        target: Entity::User,
        foreign_key: "post_id",
        through: Some(Entity::Vote),
        alias: Some("voted_posts"),
    },
];

/// Looks up the direct (non-through) association from `source` to `target`.
/// A miss means a query tried a traversal nobody declared; that is a bug in
/// query construction, not a runtime condition of normal requests.
pub fn association(source: Entity, target: Entity) -> Result<&'static Association, RequestError> {
    ASSOCIATIONS
        .iter()
        .find(|a| a.source == source && a.target == target && a.through.is_none())
        .ok_or(RequestError::QueryConstruction(
            "no association declared between these entities",
        ))
}

/// Looks up a through-table (many-to-many) association by its alias.
pub fn aliased_association(
    source: Entity,
    alias: &str,
) -> Result<&'static Association, RequestError> {
    ASSOCIATIONS
        .iter()
        .find(|a| a.source == source && a.alias == Some(alias))
        .ok_or(RequestError::QueryConstruction(
            "no aliased association declared for this entity",
        ))
}

/// Renders the join clause for a declared association.
pub fn join_clause(assoc: &Association) -> Result<String, RequestError> {
    let source = assoc.source.table();
    let target = assoc.target.table();
    match assoc.kind {
        AssociationKind::BelongsTo => Ok(format!(
            "JOIN {target} ON {target}.id = {source}.{fk}",
            fk = assoc.foreign_key
        )),
        AssociationKind::HasMany => Ok(format!(
            "LEFT JOIN {target} ON {target}.{fk} = {source}.id",
            fk = assoc.foreign_key
        )),
        AssociationKind::BelongsToMany => {
            let through = assoc
                .through
                .ok_or(RequestError::QueryConstruction(
                    "belongs-to-many association is missing its join table",
                ))?
                .table();
            // The far side of the join table comes from the symmetric
            // declaration, so both directions resolve to the same keys.
            let symmetric = ASSOCIATIONS
                .iter()
                .find(|a| {
                    a.kind == AssociationKind::BelongsToMany
                        && a.source == assoc.target
                        && a.target == assoc.source
                        && a.alias == assoc.alias
                })
                .ok_or(RequestError::QueryConstruction(
                    "belongs-to-many association has no symmetric declaration",
                ))?;
            Ok(format!(
                "JOIN {through} ON {through}.{near} = {source}.id \
                 JOIN {target} ON {target}.id = {through}.{far}",
                near = assoc.foreign_key,
                far = symmetric.foreign_key
            ))
        }
    }
}

/// Renders the aggregate projection counting target rows per source row,
/// e.g. `(SELECT COUNT(*) FROM vote WHERE vote.post_id = post.id)` for the
/// Post → Vote has-many. Computed on read; nothing stores a running counter.
pub fn count_subquery(source: Entity, target: Entity) -> Result<String, RequestError> {
    let assoc = association(source, target)?;
    if assoc.kind != AssociationKind::HasMany {
        return Err(RequestError::QueryConstruction(
            "count aggregation requires a has-many association",
        ));
    }
    Ok(format!(
        "(SELECT COUNT(*) FROM {target} WHERE {target}.{fk} = {source}.id)",
        source = assoc.source.table(),
        target = assoc.target.table(),
        fk = assoc.foreign_key
    ))
}
