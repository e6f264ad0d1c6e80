pub(crate) const TABLES_QUERY: &str = "select c.relname as name, n.nspname as schema, \
pg_total_relation_size(c.oid) as size, obj_description(c.oid, 'pg_class') as comment \
from pg_class c, pg_namespace n \
where c.relkind in ('r', 'p') and n.oid = c.relnamespace \
and n.nspname not in ('pg_catalog', 'information_schema') \
order by c.relname";
