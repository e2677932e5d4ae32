// Repository functions are generic over `E: Executor<'e, Database = Sqlite>`
// so they accept both a `&SqlitePool` and a `&mut Transaction`.

pub mod kv;
