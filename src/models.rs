use crate::responses::Value;
use crate::schema::{Field, Record};

/// Load on a single server (or the backend aggregate), as reported by `show stat`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Load {
    /// Server name; `BACKEND` or `FRONTEND` for the aggregate rows.
    pub name: String,
    /// Current sessions.
    pub current: i64,
    /// Maximum sessions observed.
    pub max: i64,
    /// Status text, e.g. `UP`, `DOWN`, `MAINT`.
    pub health: String,
    /// Number of UP to DOWN transitions.
    pub failed_check: String,
}

impl Record for Load {
    const FIELDS: &'static [Field] = &[
        Field::string("name", "svname"),
        Field::integer("current", "scur"),
        Field::integer("max", "smax"),
        Field::string("health", "status"),
        Field::string("failed_check", "chkdown"),
    ];

    fn assign(&mut self, field: &'static str, value: Value) {
        match (field, value) {
            ("name", Value::String(s)) => self.name = s,
            ("current", Value::Integer(n)) => self.current = n,
            ("max", Value::Integer(n)) => self.max = n,
            ("health", Value::String(s)) => self.health = s,
            ("failed_check", Value::String(s)) => self.failed_check = s,
            _ => {}
        }
    }
}

/// What a `show stat` row describes, from its `type` column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProxyType {
    Frontend,
    Backend,
    Server,
    Listener,
}

impl ProxyType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ProxyType::Frontend),
            1 => Some(ProxyType::Backend),
            2 => Some(ProxyType::Server),
            3 => Some(ProxyType::Listener),
            _ => None,
        }
    }
}

/// The commonly used counters of a `show stat` row.
///
/// Counters HAProxy leaves empty for a row type (for instance queue counters on a frontend)
/// decode as zero.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Stat {
    pub proxy: String,
    pub server: String,
    pub queue_current: i64,
    pub queue_max: i64,
    pub sessions_current: i64,
    pub sessions_max: i64,
    pub sessions_limit: i64,
    pub sessions_total: i64,
    pub bytes_in: i64,
    pub bytes_out: i64,
    pub request_errors: i64,
    pub connection_errors: i64,
    pub response_errors: i64,
    pub status: String,
    pub weight: i64,
    pub active_servers: i64,
    pub backup_servers: i64,
    pub failed_checks: i64,
    pub down_transitions: i64,
    /// Seconds spent DOWN.
    pub downtime: i64,
    pub type_code: i64,
    /// Sessions per second over the last second.
    pub rate: i64,
    pub check_status: String,
    pub request_rate: i64,
}

impl Stat {
    pub fn proxy_type(&self) -> Option<ProxyType> {
        ProxyType::from_code(self.type_code)
    }
}

impl Record for Stat {
    const FIELDS: &'static [Field] = &[
        Field::string("proxy", "pxname"),
        Field::string("server", "svname"),
        Field::integer("queue_current", "qcur"),
        Field::integer("queue_max", "qmax"),
        Field::integer("sessions_current", "scur"),
        Field::integer("sessions_max", "smax"),
        Field::integer("sessions_limit", "slim"),
        Field::integer("sessions_total", "stot"),
        Field::integer("bytes_in", "bin"),
        Field::integer("bytes_out", "bout"),
        Field::integer("request_errors", "ereq"),
        Field::integer("connection_errors", "econ"),
        Field::integer("response_errors", "eresp"),
        Field::string("status", "status"),
        Field::integer("weight", "weight"),
        Field::integer("active_servers", "act"),
        Field::integer("backup_servers", "bck"),
        Field::integer("failed_checks", "chkfail"),
        Field::integer("down_transitions", "chkdown"),
        Field::integer("downtime", "downtime"),
        Field::integer("type_code", "type"),
        Field::integer("rate", "rate"),
        Field::string("check_status", "check_status"),
        Field::integer("request_rate", "req_rate"),
    ];

    fn assign(&mut self, field: &'static str, value: Value) {
        match value {
            Value::String(s) => match field {
                "proxy" => self.proxy = s,
                "server" => self.server = s,
                "status" => self.status = s,
                "check_status" => self.check_status = s,
                _ => {}
            },
            Value::Integer(n) => {
                let slot = match field {
                    "queue_current" => &mut self.queue_current,
                    "queue_max" => &mut self.queue_max,
                    "sessions_current" => &mut self.sessions_current,
                    "sessions_max" => &mut self.sessions_max,
                    "sessions_limit" => &mut self.sessions_limit,
                    "sessions_total" => &mut self.sessions_total,
                    "bytes_in" => &mut self.bytes_in,
                    "bytes_out" => &mut self.bytes_out,
                    "request_errors" => &mut self.request_errors,
                    "connection_errors" => &mut self.connection_errors,
                    "response_errors" => &mut self.response_errors,
                    "weight" => &mut self.weight,
                    "active_servers" => &mut self.active_servers,
                    "backup_servers" => &mut self.backup_servers,
                    "failed_checks" => &mut self.failed_checks,
                    "down_transitions" => &mut self.down_transitions,
                    "downtime" => &mut self.downtime,
                    "type_code" => &mut self.type_code,
                    "rate" => &mut self.rate,
                    "request_rate" => &mut self.request_rate,
                    _ => return,
                };
                *slot = n;
            }
        }
    }
}
