//! Route table: every local `/netatmo/...` endpoint and its vendor mapping

use super::mapping::{ApiGroup, EndpointMapping, HttpMethod, ParamSpec as P};

pub static ENDPOINTS: &[EndpointMapping] = &[
    // Common
    EndpointMapping {
        name: "netatmo_getuser",
        path: "/netatmo/getuser",
        method: HttpMethod::Get,
        group: ApiGroup::Common,
        vendor: "getuser",
        params: &[],
    },
    EndpointMapping {
        name: "netatmo_getmeasure",
        path: "/netatmo/getmeasure/:deviceId/:moduleId",
        method: HttpMethod::Get,
        group: ApiGroup::Common,
        vendor: "getmeasure",
        params: &[
            P::path("deviceId", "device_id"),
            P::path("moduleId", "module_id"),
            P::query("scale").or_text("max"),
            P::query("type").or_text("Temperature"),
            P::query("date_begin"),
            P::query("date_end"),
            P::query("limit").or_int(1024),
            P::query("optimize").or_bool(true),
            P::query("real_time").or_bool(false),
        ],
    },
    // Weather
    EndpointMapping {
        name: "netatmo_getstationsdata",
        path: "/netatmo/weather/getstationsdata",
        method: HttpMethod::Get,
        group: ApiGroup::Weather,
        vendor: "getstationsdata",
        params: &[
            P::query("device_id"),
            P::query("get_favorites").or_bool(false),
        ],
    },
    EndpointMapping {
        name: "netatmo_getpublicdata",
        path: "/netatmo/weather/getpublicdata",
        method: HttpMethod::Get,
        group: ApiGroup::Weather,
        vendor: "getpublicdata",
        params: &[
            P::query("lat_ne").required(),
            P::query("lon_ne").required(),
            P::query("lat_sw").required(),
            P::query("lon_sw").required(),
            P::query("required_data"),
            P::query("filter").or_bool(false),
        ],
    },
    // Air care
    EndpointMapping {
        name: "netatmo_gethomecoachsdata",
        path: "/netatmo/aircare/gethomecoachsdata",
        method: HttpMethod::Get,
        group: ApiGroup::AirCare,
        vendor: "gethomecoachsdata",
        params: &[P::query("device_id")],
    },
    // Enterprise
    EndpointMapping {
        name: "netatmo_partnerdevices",
        path: "/netatmo/entrepriseapi/partnerdevices",
        method: HttpMethod::Get,
        group: ApiGroup::Enterprise,
        vendor: "partnerdevices",
        params: &[],
    },
    // Energy
    EndpointMapping {
        name: "netatmo_homesdata",
        path: "/netatmo/energy/homesdata",
        method: HttpMethod::Get,
        group: ApiGroup::Energy,
        vendor: "homesdata",
        params: &[],
    },
    EndpointMapping {
        name: "netatmo_homestatus",
        path: "/netatmo/energy/homestatus/:homeId",
        method: HttpMethod::Get,
        group: ApiGroup::Energy,
        vendor: "homestatus",
        params: &[
            P::path("homeId", "home_id"),
            P::query("device_type").renamed("device_types"),
        ],
    },
    EndpointMapping {
        name: "netatmo_setthermmode",
        path: "/netatmo/energy/setthermmode",
        method: HttpMethod::Post,
        group: ApiGroup::Energy,
        vendor: "setthermmode",
        params: &[
            P::body("home_id").required(),
            P::body("mode").required(),
            P::body("endtime").integer().omit_zero(),
        ],
    },
    EndpointMapping {
        name: "netatmo_setroomthermpoint",
        path: "/netatmo/energy/setroomthermpoint",
        method: HttpMethod::Post,
        group: ApiGroup::Energy,
        vendor: "setroomthermpoint",
        params: &[
            P::body("home_id").required(),
            P::body("room_id").required(),
            P::body("mode").required(),
            P::body("temp").integer(),
            P::body("endtime").integer(),
        ],
    },
    EndpointMapping {
        name: "netatmo_getroommeasure",
        path: "/netatmo/energy/getroommeasure/:homeId/:roomId",
        method: HttpMethod::Get,
        group: ApiGroup::Energy,
        vendor: "getroommeasure",
        params: &[
            P::path("homeId", "home_id"),
            P::path("roomId", "room_id"),
            P::query("scale").or_text("max"),
            P::query("type").or_text("Temperature"),
            P::query("date_begin"),
            P::query("date_end"),
            P::query("limit").or_int(1024),
            P::query("optimize").or_bool(true),
            P::query("real_time").or_bool(false),
        ],
    },
    EndpointMapping {
        name: "netatmo_switchhomeschedule",
        path: "/netatmo/energy/switchhomeschedule",
        method: HttpMethod::Post,
        group: ApiGroup::Energy,
        vendor: "switchhomeschedule",
        params: &[
            P::body("home_id").required(),
            P::body("schedule_id").required(),
        ],
    },
    EndpointMapping {
        name: "netatmo_synchomeschedule",
        path: "/netatmo/energy/synchomeschedule",
        method: HttpMethod::Post,
        group: ApiGroup::Energy,
        vendor: "synchomeschedule",
        params: &[
            P::body("device_id").required(),
            P::body("module_id").required(),
            P::body("zones").json().required(),
            P::body("timetable").json().required(),
            P::body("hg_temp").required(),
            P::body("away_temp").required(),
        ],
    },
    EndpointMapping {
        name: "netatmo_renamehomeschedule",
        path: "/netatmo/energy/renamehomeschedule",
        method: HttpMethod::Post,
        group: ApiGroup::Energy,
        vendor: "renamehomeschedule",
        params: &[
            P::body("home_id").required(),
            P::body("schedule_id").required(),
            P::body("name").required(),
        ],
    },
    EndpointMapping {
        name: "netatmo_deletehomeschedule",
        path: "/netatmo/energy/deletehomeschedule",
        method: HttpMethod::Delete,
        group: ApiGroup::Energy,
        vendor: "deletehomeschedule",
        params: &[
            P::body("home_id").required(),
            P::body("schedule_id").required(),
        ],
    },
    EndpointMapping {
        name: "netatmo_createnewhomeschedule",
        path: "/netatmo/energy/createnewhomeschedule",
        method: HttpMethod::Put,
        group: ApiGroup::Energy,
        vendor: "createnewhomeschedule",
        params: &[
            P::body("home_id").required(),
            P::body("timetable").json().required(),
            P::body("zones").json().required(),
            P::body("name").required(),
            P::body("hg_temp"),
            P::body("away_temp"),
        ],
    },
    // Security
    EndpointMapping {
        name: "netatmo_getcamerapicture",
        path: "/netatmo/security/getcamerapicture",
        method: HttpMethod::Get,
        group: ApiGroup::Security,
        vendor: "getcamerapicture",
        params: &[P::query("image_id").required(), P::query("key").required()],
    },
    EndpointMapping {
        name: "netatmo_geteventsuntil",
        path: "/netatmo/security/geteventsuntil",
        method: HttpMethod::Get,
        group: ApiGroup::Security,
        vendor: "geteventsuntil",
        params: &[
            P::query("home_id").required(),
            P::query("event_id").required(),
        ],
    },
    EndpointMapping {
        name: "netatmo_gethomedata",
        path: "/netatmo/security/gethomedata",
        method: HttpMethod::Get,
        group: ApiGroup::Security,
        vendor: "gethomedata",
        params: &[P::query("home_id"), P::query("size").or_int(30)],
    },
    EndpointMapping {
        name: "netatmo_getlasteventof",
        path: "/netatmo/security/getlasteventof",
        method: HttpMethod::Get,
        group: ApiGroup::Security,
        vendor: "getlasteventof",
        params: &[
            P::query("home_id").required(),
            P::query("person_id").required(),
            P::query("offset").or_int(30),
        ],
    },
    EndpointMapping {
        name: "netatmo_getnextevents",
        path: "/netatmo/security/getnextevents",
        method: HttpMethod::Get,
        group: ApiGroup::Security,
        vendor: "getnextevents",
        params: &[
            P::query("home_id").required(),
            P::query("event_id").required(),
            P::query("size").or_int(30),
        ],
    },
    EndpointMapping {
        name: "netatmo_setpersonsaway",
        path: "/netatmo/security/setpersonsaway",
        method: HttpMethod::Post,
        group: ApiGroup::Security,
        vendor: "setpersonsaway",
        params: &[P::body("home_id").required(), P::body("person_id")],
    },
    EndpointMapping {
        name: "netatmo_setpersonshome",
        path: "/netatmo/security/setpersonshome",
        method: HttpMethod::Post,
        group: ApiGroup::Security,
        vendor: "setpersonshome",
        params: &[
            P::body("home_id").required(),
            P::body("person_id").required(),
        ],
    },
];
