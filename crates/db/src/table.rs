use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    Name,
    Password,
    Role,
    IsBanned,
    BanReason,
    AccountStatus,
    VerificationToken,
    Institution,
    Bio,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Event {
    Table,
    Id,
    HostId,
    Title,
    Description,
    Location,
    PosterPath,
    StartDate,
    EndDate,
    Status,
    Visibility,
    Capacity,
    BannedAt,
    BannedBy,
    BanReason,
    ModeratedAt,
    ModeratedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Registration {
    Table,
    Id,
    EventId,
    UserId,
    Status,
    Notes,
    RegisteredAt,
}

#[derive(Iden, Clone)]
pub enum Connection {
    Table,
    Id,
    RequesterId,
    AddresseeId,
    Status,
    Message,
    RespondedAt,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum ForumPost {
    Table,
    Id,
    EventId,
    AuthorId,
    Body,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum AdminLog {
    Table,
    Id,
    AdminId,
    Action,
    TargetType,
    TargetId,
    Reason,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum NotificationJob {
    Table,
    Id,
    Kind,
    Payload,
    DedupKey,
    Status,
    AttemptCount,
    LastError,
    EnqueuedAt,
    RunAt,
    StartedAt,
    FinishedAt,
}
