//! 原料、酒罐、传感器。

use super::{Context, resolve};
use crate::cli::{MaterialsCommand, SensorsCommand, TanksCommand};
use crate::error::CliResult;
use crate::output::{Table, or_dash};
use api_contract::{MaterialDto, MaterialRequest, SensorDto, SensorRequest, TankDto, TankRequest};
use chrono::Utc;
use domain::{Material, Tank};

pub async fn materials(ctx: &mut Context, command: MaterialsCommand) -> CliResult {
    let system_id = ctx.session().await?.system_id;
    match command {
        MaterialsCommand::List => {
            let materials = ctx.api.materials(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "NOTE"]);
            for material in &materials {
                table.row([material.id.to_string(), material.name.clone(), material.note.clone()]);
            }
            let dtos: Vec<MaterialDto> = materials.iter().map(MaterialDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        MaterialsCommand::Add { name, note } => {
            let request = MaterialRequest { name, note };
            ctx.api.create_material(system_id, &request).await?;
            ctx.out.done(&format!("created material {:?}", request.name.trim()))
        }
        MaterialsCommand::Update { id, name, note } => {
            let materials = ctx.api.materials(system_id).await?;
            let material = resolve(&materials, &id.to_string(), "material")?;
            let mut request = MaterialRequest::from(material);
            if let Some(name) = name {
                request.name = name;
            }
            if let Some(note) = note {
                request.note = note;
            }
            ctx.api.update_material(material.id, &request).await?;
            ctx.out.done(&format!("updated material #{}", material.id))
        }
        MaterialsCommand::Delete { id } => {
            ctx.api.delete_material(id).await?;
            ctx.out.done(&format!("deleted material #{id}"))
        }
    }
}

fn material_id(materials: &[Material], key: Option<&str>) -> CliResult<Option<i64>> {
    key.map(|key| resolve(materials, key, "material").map(|material| material.id))
        .transpose()
}

pub async fn tanks(ctx: &mut Context, command: TanksCommand) -> CliResult {
    let system_id = ctx.session().await?.system_id;
    match command {
        TanksCommand::List => {
            let tanks = ctx.api.tanks(system_id).await?;
            let materials = ctx.api.materials(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "MATERIAL", "NOTE"]);
            for tank in &tanks {
                let material = tank.material_id.map(|material_id| {
                    materials
                        .iter()
                        .find(|material| material.id == material_id)
                        .map(|material| material.name.clone())
                        .unwrap_or_else(|| format!("#{material_id}"))
                });
                table.row([
                    tank.id.to_string(),
                    tank.name.clone(),
                    or_dash(material),
                    tank.note.clone(),
                ]);
            }
            let dtos: Vec<TankDto> = tanks.iter().map(TankDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        TanksCommand::Add {
            name,
            note,
            material,
        } => {
            let materials = match material {
                Some(_) => ctx.api.materials(system_id).await?,
                None => Vec::new(),
            };
            let request = TankRequest {
                name,
                note,
                material_id: material_id(&materials, material.as_deref())?,
            };
            ctx.api.create_tank(system_id, &request).await?;
            ctx.out.done(&format!("created tank {:?}", request.name.trim()))
        }
        TanksCommand::Update {
            id,
            name,
            note,
            material,
            empty,
        } => {
            let tanks = ctx.api.tanks(system_id).await?;
            let tank = resolve(&tanks, &id.to_string(), "tank")?;
            let mut request = TankRequest::from(tank);
            if let Some(name) = name {
                request.name = name;
            }
            if let Some(note) = note {
                request.note = note;
            }
            if material.is_some() {
                let materials = ctx.api.materials(system_id).await?;
                request.material_id = material_id(&materials, material.as_deref())?;
            } else if empty {
                request.material_id = None;
            }
            ctx.api.update_tank(tank.id, &request).await?;
            ctx.out.done(&format!("updated tank #{}", tank.id))
        }
        TanksCommand::Delete { id } => {
            ctx.api.delete_tank(id).await?;
            ctx.out.done(&format!("deleted tank #{id}"))
        }
    }
}

fn tank_id(tanks: &[Tank], key: Option<&str>) -> CliResult<Option<i64>> {
    key.map(|key| resolve(tanks, key, "tank").map(|tank| tank.id))
        .transpose()
}

pub async fn sensors(ctx: &mut Context, command: SensorsCommand) -> CliResult {
    let system_id = ctx.session().await?.system_id;
    match command {
        SensorsCommand::List => {
            let sensors = ctx.api.sensors(system_id).await?;
            let tanks = ctx.api.tanks(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "UNIT", "TANK", "POSITION", "DATE"]);
            for sensor in &sensors {
                let tank = sensor.tank_id.map(|tank_id| {
                    tanks
                        .iter()
                        .find(|tank| tank.id == tank_id)
                        .map(|tank| tank.name.clone())
                        .unwrap_or_else(|| format!("#{tank_id}"))
                });
                table.row([
                    sensor.id.to_string(),
                    sensor.name.clone(),
                    sensor.unit.clone(),
                    or_dash(tank),
                    sensor.position.clone(),
                    sensor.date.format("%Y-%m-%d").to_string(),
                ]);
            }
            let dtos: Vec<SensorDto> = sensors.iter().map(SensorDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        SensorsCommand::Add {
            name,
            unit,
            position,
            tank,
            date,
        } => {
            let tanks = match tank {
                Some(_) => ctx.api.tanks(system_id).await?,
                None => Vec::new(),
            };
            let request = SensorRequest {
                name,
                unit,
                tank_id: tank_id(&tanks, tank.as_deref())?,
                position,
                date: date.unwrap_or_else(Utc::now),
            };
            ctx.api.create_sensor(system_id, &request).await?;
            ctx.out.done(&format!("created sensor {:?}", request.name.trim()))
        }
        SensorsCommand::Update {
            id,
            name,
            unit,
            position,
            tank,
            detach,
            date,
        } => {
            let sensors = ctx.api.sensors(system_id).await?;
            let sensor = sensors
                .iter()
                .find(|sensor| sensor.id == id)
                .ok_or_else(|| crate::error::CliError::not_found("sensor", &id.to_string()))?;
            let mut request = SensorRequest::from(sensor);
            if let Some(name) = name {
                request.name = name;
            }
            if let Some(unit) = unit {
                request.unit = unit;
            }
            if let Some(position) = position {
                request.position = position;
            }
            if let Some(date) = date {
                request.date = date;
            }
            if tank.is_some() {
                let tanks = ctx.api.tanks(system_id).await?;
                request.tank_id = tank_id(&tanks, tank.as_deref())?;
            } else if detach {
                request.tank_id = None;
            }
            ctx.api.update_sensor(sensor.id, &request).await?;
            ctx.out.done(&format!("updated sensor #{}", sensor.id))
        }
        SensorsCommand::Delete { id } => {
            ctx.api.delete_sensor(id).await?;
            ctx.out.done(&format!("deleted sensor #{id}"))
        }
    }
}
